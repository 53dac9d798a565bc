// ==========================================
// 项目执行仪表盘 - 界面文案
// ==========================================
// 文案表: locales/en.yml（缺省）与 locales/zh-CN.yml
// 缺失的键回退到英文
// ==========================================

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换全局语言，影响之后所有错误提示
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 按 `%{name}` 占位符替换参数，未匹配的参数忽略
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
