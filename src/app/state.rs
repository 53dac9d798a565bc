// ==========================================
// 项目执行仪表盘 - 应用状态
// ==========================================
// 职责: 持有唯一的内存快照（原始记录 / 层级 / 筛选结果 / 筛选条件）
// 红线: 只有 load / update_filters / clear_filter / reset_filters 能替换派生数据
//       加载失败时保留上一次成功加载的数据
// ==========================================

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::{
    DashboardFilters, DashboardView, DataSource, FilterKey, HierarchicalData, WorkflowRecord,
};
use crate::engine::{FilterEngine, HierarchyBuilder};
use crate::i18n::{t, t_with_args};
use crate::importer::{
    FetchError, ImportError, RecordNormalizer, SheetCredentials, SheetFetcher,
    UniversalFileParser,
};

/// 最近一次成功加载的元信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSnapshot {
    pub load_id: Uuid,
    pub source: DataSource,
    pub loaded_at: DateTime<Utc>,
    pub record_count: usize,
    pub has_batch: bool,
}

/// 仪表盘状态容器
///
/// 视图层只读取 filtered_data / processed_data，不自行重建层级
pub struct DashboardState {
    raw_data: Vec<WorkflowRecord>,
    processed_data: HierarchicalData,
    filtered_data: Vec<WorkflowRecord>,
    filters: DashboardFilters,

    is_loading: bool,
    error: Option<String>,

    data_source: DataSource,
    credentials: Option<SheetCredentials>,
    selected_view: DashboardView,
    show_sidebar: bool,
    snapshot: Option<DatasetSnapshot>,

    config: ConfigManager,
    normalizer: RecordNormalizer,
    hierarchy_builder: HierarchyBuilder,
    filter_engine: FilterEngine,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    /// 使用默认配置创建空状态
    pub fn new() -> Self {
        Self::with_config(ConfigManager::new())
    }

    pub fn with_config(config: ConfigManager) -> Self {
        Self {
            raw_data: Vec::new(),
            processed_data: HierarchicalData::default(),
            filtered_data: Vec::new(),
            filters: DashboardFilters::default(),
            is_loading: false,
            error: None,
            data_source: DataSource::default(),
            credentials: None,
            selected_view: DashboardView::default(),
            show_sidebar: true,
            snapshot: None,
            normalizer: RecordNormalizer::new(),
            hierarchy_builder: HierarchyBuilder::from_config(&config),
            filter_engine: FilterEngine::new(),
            config,
        }
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载原始输入（记录数组或嵌套对象）
    ///
    /// # 返回
    /// - Ok(usize): 加载的记录数
    /// - Err(ApiError::LoadFailed): 输入形状无效或没有记录，原数据保持不变
    pub fn load(&mut self, input: &Value) -> ApiResult<usize> {
        let source = self.data_source;
        self.load_with_source(input, source)
    }

    /// 从本地文件加载（.json / .csv / .xlsx / .xls）
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> ApiResult<usize> {
        let path = path.as_ref();
        self.is_loading = true;

        let value = match UniversalFileParser.parse(path) {
            Ok(value) => value,
            Err(err) => {
                let path_text = path.display().to_string();
                let message = match &err {
                    ImportError::FileNotFound(_)
                    | ImportError::FileReadError(_)
                    | ImportError::JsonParseError(_) => {
                        t_with_args("load.file_read_error", &[("path", path_text.as_str())])
                    }
                    ImportError::UnsupportedFormat(_) => {
                        t_with_args("load.unsupported_format", &[("path", path_text.as_str())])
                    }
                    _ => t("load.file_format_error"),
                };
                warn!(error = %err, "文件解析失败");
                return Err(self.fail(message));
            }
        };

        self.load_with_source(&value, DataSource::Excel)
    }

    /// 从远程表格拉取并加载
    ///
    /// 拉取期间 is_loading 为 true；失败时展示上游说明，缺省为通用提示
    pub async fn load_remote(
        &mut self,
        credentials: &SheetCredentials,
        fetcher: &dyn SheetFetcher,
    ) -> ApiResult<usize> {
        if let Err(err) = credentials.validate() {
            let message = err
                .upstream_message()
                .map(str::to_string)
                .unwrap_or_else(|| t("load.invalid_credentials"));
            return Err(self.fail(message));
        }

        self.is_loading = true;
        self.error = None;
        info!(sheet_id = %credentials.sheet_id, "开始拉取远程表格");

        let value = match fetcher.fetch(credentials).await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "远程表格拉取失败");
                let message = match &err {
                    FetchError::EmptyResponse => t("load.no_remote_data"),
                    other => other
                        .upstream_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| t("load.remote_failed")),
                };
                return Err(self.fail(message));
            }
        };

        let has_rows = value.as_array().is_some_and(|rows| !rows.is_empty());
        if !has_rows {
            return Err(self.fail(t("load.no_remote_data")));
        }

        let count = self.load_with_source(&value, DataSource::Smartsheet)?;
        // 只保留成功拉取过的凭据
        self.credentials = Some(credentials.clone());
        Ok(count)
    }

    fn load_with_source(&mut self, input: &Value, source: DataSource) -> ApiResult<usize> {
        self.is_loading = true;

        let records = match self.normalizer.try_normalize(input) {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                warn!("输入中没有任何记录");
                return Err(self.fail(t("load.file_format_error")));
            }
            Err(err) => {
                warn!(error = %err, "输入形状无效");
                return Err(self.fail(t("load.file_format_error")));
            }
        };

        self.replace_dataset(records, source);
        Ok(self.raw_data.len())
    }

    /// 整体替换数据集: 原始记录 → 层级 → 筛选结果 = 原始记录
    fn replace_dataset(&mut self, records: Vec<WorkflowRecord>, source: DataSource) {
        let hierarchy = self.hierarchy_builder.build(&records);

        self.snapshot = Some(DatasetSnapshot {
            load_id: Uuid::new_v4(),
            source,
            loaded_at: Utc::now(),
            record_count: records.len(),
            has_batch: hierarchy.has_batch(),
        });
        self.processed_data = hierarchy;
        self.filtered_data = records.clone();
        self.raw_data = records;
        self.filters = DashboardFilters::default();
        self.data_source = source;
        self.error = None;
        self.is_loading = false;

        info!(
            record_count = self.raw_data.len(),
            has_batch = self.processed_data.has_batch(),
            source = %source,
            "数据集加载完成"
        );
    }

    /// 记录失败信息（不触碰已有数据）
    fn fail(&mut self, message: String) -> ApiError {
        self.is_loading = false;
        self.error = Some(message.clone());
        ApiError::LoadFailed(message)
    }

    // ==========================================
    // 筛选
    // ==========================================

    /// 合并局部条件，并对原始记录重新筛选
    pub fn update_filters(&mut self, partial: DashboardFilters) {
        self.filters.merge(partial);
        self.filtered_data = self.filter_engine.apply(&self.raw_data, &self.filters);
        info!(
            active_filters = self.filters.active_count(),
            filtered = self.filtered_data.len(),
            total = self.raw_data.len(),
            "筛选条件已更新"
        );
    }

    /// 撤销单个维度的条件，其余条件保持不变
    pub fn clear_filter(&mut self, key: FilterKey) {
        self.filters.clear(key);
        self.filtered_data = self.filter_engine.apply(&self.raw_data, &self.filters);
        info!(
            ?key,
            active_filters = self.filters.active_count(),
            filtered = self.filtered_data.len(),
            "筛选维度已清除"
        );
    }

    /// 清空条件，筛选结果恢复为全部原始记录
    pub fn reset_filters(&mut self) {
        self.filters = DashboardFilters::default();
        self.filtered_data = self.raw_data.clone();
    }

    // ==========================================
    // 界面状态
    // ==========================================

    pub fn set_data_source(&mut self, source: DataSource) {
        self.data_source = source;
    }

    pub fn set_credentials(&mut self, credentials: SheetCredentials) {
        self.credentials = Some(credentials);
    }

    pub fn set_selected_view(&mut self, view: DashboardView) {
        self.selected_view = view;
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 按配置切换界面语言（全局生效，通常在启动时调用一次）
    pub fn apply_locale(&self) {
        let locale = self.config.locale();
        crate::i18n::set_locale(&locale);
        info!(locale = %locale, "界面语言已设置");
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn raw_data(&self) -> &[WorkflowRecord] {
        &self.raw_data
    }

    pub fn processed_data(&self) -> &HierarchicalData {
        &self.processed_data
    }

    pub fn filtered_data(&self) -> &[WorkflowRecord] {
        &self.filtered_data
    }

    pub fn filters(&self) -> &DashboardFilters {
        &self.filters
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn credentials(&self) -> Option<&SheetCredentials> {
        self.credentials.as_ref()
    }

    pub fn selected_view(&self) -> DashboardView {
        self.selected_view
    }

    pub fn show_sidebar(&self) -> bool {
        self.show_sidebar
    }

    pub fn snapshot(&self) -> Option<&DatasetSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn has_data(&self) -> bool {
        !self.raw_data.is_empty()
    }
}
