use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::borrower::BorrowerData;
use crate::config::DocumentConfig;
use crate::document::{emit, Block, PlainTextSink};
use crate::error::{ErrorCategory, MicroloanError};
use crate::loan::{compute_schedule, compute_totals, LoanParameters};
use crate::raster::{RasterRegion, Rasterizer};
use crate::render::{render_contract, render_schedule_summary};
use crate::types::{Days, Money};
use crate::MicroloanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Schedule,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = MicroloanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(MicroloanError::InvalidConfig {
                field: "format".into(),
                reason: format!("unknown export format '{other}' (expected pdf or txt)"),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A finished document, ready to hand to a download target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub document: DocumentType,
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Page count for PDFs; text exports count as one page.
    pub pages: usize,
}

impl Artifact {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// Everything a contract needs besides the lender configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub parameters: LoanParameters,
    pub borrower: BorrowerData,
    pub contract_date: NaiveDate,
    pub contract_number: u32,
}

/// Where finished artifacts go.
pub trait DownloadTarget {
    type Location;

    fn deliver(&mut self, artifact: &Artifact) -> MicroloanResult<Self::Location>;
}

/// Writes artifacts into a directory.
///
/// Bytes go to a hidden `.name.part` file that is renamed into place once
/// complete; on failure the partial file is removed.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryTarget {
    type Location = PathBuf;

    fn deliver(&mut self, artifact: &Artifact) -> MicroloanResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| io_failure("cannot create", &self.dir, e))?;
        let target = self.dir.join(&artifact.file_name);
        let partial = self.dir.join(format!(".{}.part", artifact.file_name));

        let written = std::fs::write(&partial, &artifact.bytes)
            .map_err(|e| io_failure("cannot write", &partial, e))
            .and_then(|()| {
                std::fs::rename(&partial, &target)
                    .map_err(|e| io_failure("cannot move into place", &target, e))
            });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }

        info!(path = %target.display(), bytes = artifact.bytes.len(), "artifact delivered");
        Ok(target)
    }
}

fn io_failure(what: &str, path: &Path, e: std::io::Error) -> MicroloanError {
    MicroloanError::ExportFailed(format!("{what} {}: {e}", path.display()))
}

/// `Contract_1234_Иванов_Иван.pdf`
pub fn contract_file_name(contract_number: u32, full_name: &str, format: ExportFormat) -> String {
    format!(
        "Contract_{contract_number}_{}.{}",
        underscored(full_name.trim()),
        format.extension()
    )
}

/// `Schedule_50000_30days.pdf`
pub fn schedule_file_name(principal: Money, term_days: Days, format: ExportFormat) -> String {
    format!("Schedule_{principal}_{term_days}days.{}", format.extension())
}

// Every character that is not a letter or digit becomes `_`.
fn underscored(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Runs validation, rendering, pagination and serialization for both documents.
#[derive(Debug, Clone, Default)]
pub struct ArtifactExporter {
    config: DocumentConfig,
}

impl ArtifactExporter {
    pub fn new(config: DocumentConfig) -> MicroloanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Contract blocks, shared by every output format.
    pub fn contract_blocks(&self, request: &ContractRequest) -> MicroloanResult<Vec<Block>> {
        let p = &request.parameters;
        let blocks = compute_totals(p.principal, p.term_days, p.daily_rate).and_then(|totals| {
            render_contract(
                p,
                &totals,
                &request.borrower,
                request.contract_date,
                request.contract_number,
                &self.config,
            )
        });
        logged(blocks, "contract")
    }

    pub fn schedule_blocks(
        &self,
        params: &LoanParameters,
        issued_on: NaiveDate,
    ) -> MicroloanResult<Vec<Block>> {
        let blocks = compute_totals(params.principal, params.term_days, params.daily_rate)
            .and_then(|totals| {
                let schedule =
                    compute_schedule(params.principal, params.term_days, params.daily_rate)?;
                Ok(render_schedule_summary(
                    params,
                    &totals,
                    &schedule,
                    issued_on,
                    &self.config,
                ))
            });
        logged(blocks, "schedule")
    }

    pub fn build_contract(
        &self,
        request: &ContractRequest,
        format: ExportFormat,
    ) -> MicroloanResult<Artifact> {
        let blocks = self.contract_blocks(request)?;
        let (bytes, pages) = logged(self.render(&blocks, format), "contract")?;
        Ok(Artifact {
            document: DocumentType::Contract,
            format,
            file_name: contract_file_name(
                request.contract_number,
                &request.borrower.full_name,
                format,
            ),
            bytes,
            pages,
        })
    }

    /// Schedule re-rendered from blocks: a boxed text table or a PDF.
    pub fn build_schedule(
        &self,
        params: &LoanParameters,
        issued_on: NaiveDate,
        format: ExportFormat,
    ) -> MicroloanResult<Artifact> {
        let blocks = self.schedule_blocks(params, issued_on)?;
        let (bytes, pages) = logged(self.render(&blocks, format), "schedule")?;
        Ok(Artifact {
            document: DocumentType::Schedule,
            format,
            file_name: schedule_file_name(params.principal, params.term_days, format),
            bytes,
            pages,
        })
    }

    /// Schedule as a captured image sliced across PDF pages.
    ///
    /// The capture is awaited in full before pagination starts.
    pub async fn build_schedule_capture(
        &self,
        params: &LoanParameters,
        rasterizer: &dyn Rasterizer,
        region: &RasterRegion,
    ) -> MicroloanResult<Artifact> {
        logged(params.validate(), "schedule capture")?;
        let bitmap = logged(rasterizer.rasterize(region).await, "schedule capture")?;
        let blocks = [Block::Bitmap(Arc::new(bitmap))];
        let (bytes, pages) = logged(self.render(&blocks, ExportFormat::Pdf), "schedule capture")?;
        Ok(Artifact {
            document: DocumentType::Schedule,
            format: ExportFormat::Pdf,
            file_name: schedule_file_name(params.principal, params.term_days, ExportFormat::Pdf),
            bytes,
            pages,
        })
    }

    /// Hand a finished artifact to `target`.
    pub fn export<T: DownloadTarget>(
        &self,
        artifact: &Artifact,
        target: &mut T,
    ) -> MicroloanResult<T::Location> {
        logged(target.deliver(artifact), "delivery")
    }

    pub fn export_contract<T: DownloadTarget>(
        &self,
        request: &ContractRequest,
        format: ExportFormat,
        target: &mut T,
    ) -> MicroloanResult<T::Location> {
        let artifact = self.build_contract(request, format)?;
        self.export(&artifact, target)
    }

    pub fn export_schedule<T: DownloadTarget>(
        &self,
        params: &LoanParameters,
        issued_on: NaiveDate,
        format: ExportFormat,
        target: &mut T,
    ) -> MicroloanResult<T::Location> {
        let artifact = self.build_schedule(params, issued_on, format)?;
        self.export(&artifact, target)
    }

    fn render(&self, blocks: &[Block], format: ExportFormat) -> MicroloanResult<(Vec<u8>, usize)> {
        match format {
            ExportFormat::Text => {
                let text = emit(blocks, PlainTextSink::new())?;
                Ok((text.into_bytes(), 1))
            }
            ExportFormat::Pdf => self.render_pdf(blocks),
        }
    }

    #[cfg(feature = "pdf")]
    fn render_pdf(&self, blocks: &[Block]) -> MicroloanResult<(Vec<u8>, usize)> {
        use crate::layout::{write_with, HelveticaMetrics};

        let c = &self.config;
        let pages = write_with(blocks, c.page, c.margins, c.typography, HelveticaMetrics)?;
        let bytes = crate::pdf::serialize(&pages, c.page)?;
        Ok((bytes, pages.len()))
    }

    #[cfg(not(feature = "pdf"))]
    fn render_pdf(&self, _blocks: &[Block]) -> MicroloanResult<(Vec<u8>, usize)> {
        Err(MicroloanError::ExportFailed(
            "PDF output is not enabled in this build".into(),
        ))
    }
}

// Validation problems are the user's to fix; everything else is a fault.
fn logged<T>(result: MicroloanResult<T>, stage: &str) -> MicroloanResult<T> {
    if let Err(e) = &result {
        match e.category() {
            ErrorCategory::Input | ErrorCategory::Validation => {
                warn!(stage, error = %e, "document rejected")
            }
            ErrorCategory::Layout | ErrorCategory::Render | ErrorCategory::Export => {
                error!(stage, error = %e, "document generation failed")
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Keeps delivered artifacts in memory.
    #[derive(Default)]
    struct Collect(Vec<Artifact>);

    impl DownloadTarget for Collect {
        type Location = usize;

        fn deliver(&mut self, artifact: &Artifact) -> MicroloanResult<usize> {
            self.0.push(artifact.clone());
            Ok(self.0.len() - 1)
        }
    }

    fn request(name: &str) -> ContractRequest {
        ContractRequest {
            parameters: LoanParameters::new(50_000, 30, dec!(0.02)),
            borrower: BorrowerData {
                full_name: name.into(),
                birth_date: "01.01.1990".into(),
                passport_series: "4510".into(),
                passport_number: "123456".into(),
                address: "Москва".into(),
                phone: "+7 900 000-00-00".into(),
            },
            contract_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            contract_number: 42,
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            contract_file_name(42, " Иванов Иван-Петрович ", ExportFormat::Pdf),
            "Contract_42_Иванов_Иван_Петрович.pdf"
        );
        assert_eq!(
            schedule_file_name(50_000, 30, ExportFormat::Text),
            "Schedule_50000_30days.txt"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("docx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Text.media_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_text_contract_goes_to_target() {
        let exporter = ArtifactExporter::default();
        let mut target = Collect::default();
        exporter
            .export_contract(&request("Иванов Иван"), ExportFormat::Text, &mut target)
            .unwrap();
        let artifact = &target.0[0];
        assert_eq!(artifact.file_name, "Contract_42_Иванов_Иван.txt");
        assert_eq!(artifact.document, DocumentType::Contract);
        let text = String::from_utf8(artifact.bytes.clone()).unwrap();
        assert!(text.contains("ДОГОВОР ЗАЙМА № 42"));
    }

    #[test]
    fn test_incomplete_borrower_never_reaches_target() {
        let exporter = ArtifactExporter::default();
        let mut target = Collect::default();
        let err = exporter
            .export_contract(&request(""), ExportFormat::Pdf, &mut target)
            .unwrap_err();
        assert!(matches!(err, MicroloanError::IncompleteBorrowerData { .. }));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(target.0.is_empty());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let exporter = ArtifactExporter::default();
        let err = exporter
            .build_schedule(
                &LoanParameters::new(50_000, 0, dec!(0.02)),
                NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
                ExportFormat::Text,
            )
            .unwrap_err();
        assert!(matches!(err, MicroloanError::InvalidTerm(0)));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_schedule_spans_pages() {
        let exporter = ArtifactExporter::default();
        let artifact = exporter
            .build_schedule(
                &LoanParameters::new(50_000, 90, dec!(0.02)),
                NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
                ExportFormat::Pdf,
            )
            .unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert!(artifact.pages >= 2);
        assert_eq!(artifact.file_name, "Schedule_50000_90days.pdf");
        assert_eq!(artifact.media_type(), "application/pdf");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DocumentConfig::default();
        config.typography.body_size = -1.0;
        assert!(ArtifactExporter::new(config).is_err());
    }
}
