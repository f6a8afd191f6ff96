// ── HOT22 file store ──
//
// Upload progress and outcome, processed-record statistics, and one
// paginated record view per record type.

use std::collections::BTreeMap;

use hot22_api::{FileStats, Page, Pagination, UploadResult};

use crate::error::ErrorInfo;
use crate::query::QueryKey;
use crate::store::{FetchSlice, Reducer, RequestToken, Settled, StaleTracking};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub uploading: bool,
    pub file_name: Option<String>,
    /// 0..=100, monotonic within one upload.
    pub progress: u8,
    pub result: Option<UploadResult>,
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordsPage {
    pub slice: FetchSlice<Vec<serde_json::Value>>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct FilesState {
    pub upload: UploadState,
    pub stats: FetchSlice<Option<FileStats>>,
    pub records: BTreeMap<String, RecordsPage>,
    pub active_record_type: Option<String>,
}

impl FilesState {
    pub fn records_for(&self, record_type: &str) -> Option<&RecordsPage> {
        self.records.get(record_type)
    }
}

#[derive(Debug, Clone)]
pub enum FilesAction {
    UploadStarted(String),
    UploadProgress(u8),
    UploadFinished(Result<UploadResult, ErrorInfo>),
    ResetUpload,

    StatsPending(RequestToken),
    StatsSettled(RequestToken, Settled<FileStats>),

    SetRecordType(Option<String>),
    RecordsPending(String, RequestToken),
    RecordsSettled(String, RequestToken, Settled<Page<serde_json::Value>>),
    /// Every processed record was deleted server-side.
    RecordsCleared,
}

impl Reducer for FilesState {
    type Action = FilesAction;

    fn reduce(&mut self, action: FilesAction) {
        match action {
            FilesAction::UploadStarted(file_name) => {
                self.upload = UploadState {
                    uploading: true,
                    file_name: Some(file_name),
                    ..UploadState::default()
                };
            }
            FilesAction::UploadProgress(pct) => {
                self.upload.progress = self.upload.progress.max(pct.min(100));
            }
            FilesAction::UploadFinished(result) => {
                self.upload.uploading = false;
                match result {
                    Ok(result) => {
                        self.upload.progress = 100;
                        self.upload.result = Some(result);
                    }
                    Err(error) => self.upload.error = Some(error),
                }
            }
            FilesAction::ResetUpload => self.upload = UploadState::default(),

            FilesAction::StatsPending(token) => self.stats.begin(token),
            FilesAction::StatsSettled(token, settled) => {
                self.stats.settle(token, settled, |s| Some(s.clone()));
            }

            FilesAction::SetRecordType(record_type) => {
                self.active_record_type = crate::filters::normalize(record_type);
            }
            FilesAction::RecordsPending(record_type, token) => {
                self.records.entry(record_type).or_default().slice.begin(token);
            }
            FilesAction::RecordsSettled(record_type, token, settled) => {
                let page = self.records.entry(record_type).or_default();
                let mut pagination = None;
                let applied = page.slice.settle(token, settled, |p: &Page<serde_json::Value>| {
                    pagination = Some(p.pagination.clone());
                    p.data.clone()
                });
                if let (true, Some(p)) = (applied, pagination) {
                    page.pagination = p;
                }
            }
            FilesAction::RecordsCleared => {
                for page in self.records.values_mut() {
                    page.slice.data.clear();
                    page.pagination = Pagination::default();
                }
            }
        }
    }
}

impl StaleTracking for FilesState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let mut changed = self.stats.mark_stale_if(keys);
        for page in self.records.values_mut() {
            changed |= page.slice.mark_stale_if(keys);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::store::Fetched;

    #[test]
    fn progress_never_moves_backwards() {
        let mut state = FilesState::default();
        state.reduce(FilesAction::UploadStarted("hot.dat".into()));
        for pct in [10, 40, 30, 250] {
            state.reduce(FilesAction::UploadProgress(pct));
        }
        assert_eq!(state.upload.progress, 100);
        assert!(state.upload.uploading);
    }

    #[test]
    fn failed_upload_keeps_progress_and_records_error() {
        let mut state = FilesState::default();
        state.reduce(FilesAction::UploadStarted("hot.dat".into()));
        state.reduce(FilesAction::UploadProgress(60));
        state.reduce(FilesAction::UploadFinished(Err(ErrorInfo::new("HTTP 413"))));
        assert!(!state.upload.uploading);
        assert_eq!(state.upload.progress, 60);
        assert!(state.upload.result.is_none());
        assert!(state.upload.error.is_some());
    }

    #[test]
    fn records_are_tracked_per_type() {
        let mut state = FilesState::default();
        let token = RequestToken::next();
        state.reduce(FilesAction::RecordsPending("BKS24".into(), token));
        state.reduce(FilesAction::RecordsSettled(
            "BKS24".into(),
            token,
            Ok(Fetched {
                value: Arc::new(Page {
                    data: vec![json!({ "TDNR": "0741234567890" })],
                    pagination: Pagination {
                        total_records: 1,
                        ..Pagination::default()
                    },
                }),
                key: QueryKey::new("files.records", "[\"BKS24\",[]]"),
            }),
        ));

        assert_eq!(state.records_for("BKS24").map(|p| p.slice.data.len()), Some(1));
        assert!(state.records_for("BKS30").is_none());

        state.reduce(FilesAction::RecordsCleared);
        assert!(state.records["BKS24"].slice.data.is_empty());
    }
}
