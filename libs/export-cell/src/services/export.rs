use std::future::Future;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{AssessmentFilter, ConsultationFilter};

use crate::csv::{to_csv, CsvRecord};
use crate::models::{ExportDataset, ExportFormat, ExportRequest};

const EXPORT_PAGE_SIZE: i64 = 500;
const MAX_EXPORT_ROWS: usize = 50_000;

/// A rendered export, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
    pub rows: usize,
}

pub struct ExportService {
    store: ClinicStore,
}

/// Pulls every page from a paged listing, up to the export row cap.
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut rows = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let fetched = page.len();
        rows.extend(page);

        if (fetched as i64) < EXPORT_PAGE_SIZE {
            break;
        }
        if rows.len() >= MAX_EXPORT_ROWS {
            warn!("Export truncated at {} rows", MAX_EXPORT_ROWS);
            rows.truncate(MAX_EXPORT_ROWS);
            break;
        }
        offset += EXPORT_PAGE_SIZE;
    }

    Ok(rows)
}

fn render<R: CsvRecord + Serialize>(rows: &[R], format: ExportFormat) -> Result<String> {
    Ok(match format {
        ExportFormat::Csv => to_csv(rows),
        ExportFormat::Json => serde_json::to_string_pretty(rows)?,
    })
}

impl ExportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn export(&self, request: &ExportRequest) -> Result<ExportFile> {
        let store = &self.store;
        let (body, rows) = match request.dataset {
            ExportDataset::Consultations => {
                let rows = collect_pages(move |offset| {
                    let filter = ConsultationFilter {
                        clinic_group: request.clinic_group,
                        from: request.from,
                        to: request.to,
                        limit: Some(EXPORT_PAGE_SIZE),
                        offset: Some(offset),
                    };
                    async move { store.list_consultations(&filter).await }
                })
                .await?;
                (render(&rows, request.format)?, rows.len())
            }
            ExportDataset::Assessments => {
                let rows = collect_pages(move |offset| {
                    let filter = AssessmentFilter {
                        clinic_group: request.clinic_group,
                        from: request.from,
                        to: request.to,
                        limit: Some(EXPORT_PAGE_SIZE),
                        offset: Some(offset),
                        ..Default::default()
                    };
                    async move { store.list_assessments(&filter).await }
                })
                .await?;
                (render(&rows, request.format)?, rows.len())
            }
            ExportDataset::Patients => {
                let mut rows = collect_pages(move |offset| {
                    store.list_patients(
                        None,
                        request.clinic_group,
                        Some(EXPORT_PAGE_SIZE),
                        Some(offset),
                    )
                })
                .await?;
                rows.retain(|p| {
                    request.from.map_or(true, |from| p.created_at >= from)
                        && request.to.map_or(true, |to| p.created_at <= to)
                });
                (render(&rows, request.format)?, rows.len())
            }
        };

        info!("Exported {} {} rows as {}", rows, request.dataset, request.format.extension());

        Ok(ExportFile {
            file_name: format!(
                "{}-{}.{}",
                request.dataset,
                Utc::now().format("%Y-%m-%d"),
                request.format.extension()
            ),
            content_type: request.format.content_type(),
            body,
            rows,
        })
    }
}
