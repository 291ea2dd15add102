use async_trait::async_trait;
use chrono::NaiveDate;
use microloan_core::raster::{Bitmap, RasterRegion, Rasterizer};
use microloan_core::{
    ArtifactExporter, BorrowerData, ContractRequest, DirectoryTarget, DocumentType, ExportFormat,
    LoanParameters, MicroloanError, MicroloanResult,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn request(full_name: &str) -> ContractRequest {
    ContractRequest {
        parameters: LoanParameters::new(80_000, 45, dec!(0.015)),
        borrower: BorrowerData {
            full_name: full_name.into(),
            birth_date: "03.04.1985".into(),
            passport_series: "4512".into(),
            passport_number: "765432".into(),
            address: "г. Москва, ул. Тверская, д. 1".into(),
            phone: "+7 926 000-11-22".into(),
        },
        contract_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        contract_number: 7319,
    }
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ===========================================================================
// Directory delivery
// ===========================================================================

#[test]
fn test_contract_pdf_lands_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = ArtifactExporter::default();
    let mut target = DirectoryTarget::new(dir.path());

    let path = exporter
        .export_contract(&request("Петров Пётр"), ExportFormat::Pdf, &mut target)
        .unwrap();

    assert_eq!(path, dir.path().join("Contract_7319_Петров_Пётр.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(files_in(dir.path()), vec!["Contract_7319_Петров_Пётр.pdf"]);
}

#[test]
fn test_missing_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("schedules");
    let exporter = ArtifactExporter::default();
    let mut target = DirectoryTarget::new(&nested);

    let path = exporter
        .export_schedule(
            &LoanParameters::new(50_000, 30, dec!(0.02)),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            ExportFormat::Text,
            &mut target,
        )
        .unwrap();

    assert_eq!(path, nested.join("Schedule_50000_30days.txt"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ДЕТАЛЬНЫЙ ГРАФИК ВЫПЛАТ"));
}

#[test]
fn test_incomplete_borrower_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = ArtifactExporter::default();
    let mut target = DirectoryTarget::new(dir.path());

    let result = exporter.export_contract(&request("   "), ExportFormat::Pdf, &mut target);

    match result {
        Err(MicroloanError::IncompleteBorrowerData { missing }) => {
            assert_eq!(missing, vec!["full_name"])
        }
        other => panic!("expected incomplete borrower data, got {other:?}"),
    }
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_invalid_loan_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = ArtifactExporter::default();
    let mut target = DirectoryTarget::new(dir.path());

    let result = exporter.export_schedule(
        &LoanParameters::new(0, 30, dec!(0.02)),
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        ExportFormat::Pdf,
        &mut target,
    );

    assert!(matches!(result, Err(MicroloanError::InvalidPrincipal(_))));
    assert!(files_in(dir.path()).is_empty());
}

// ===========================================================================
// Built artifacts
// ===========================================================================

#[test]
fn test_schedule_pdf_spans_several_pages() {
    let exporter = ArtifactExporter::default();
    let artifact = exporter
        .build_schedule(
            &LoanParameters::new(100_000, 90, dec!(0.01)),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            ExportFormat::Pdf,
        )
        .unwrap();

    assert_eq!(artifact.document, DocumentType::Schedule);
    assert_eq!(artifact.media_type(), "application/pdf");
    assert!(artifact.pages >= 3, "90 rows fit on {} page(s)", artifact.pages);
}

#[test]
fn test_text_and_pdf_share_file_stem() {
    let exporter = ArtifactExporter::default();
    let text = exporter
        .build_contract(&request("Петров Пётр"), ExportFormat::Text)
        .unwrap();
    let pdf = exporter
        .build_contract(&request("Петров Пётр"), ExportFormat::Pdf)
        .unwrap();

    assert_eq!(text.file_name, "Contract_7319_Петров_Пётр.txt");
    assert_eq!(pdf.file_name, "Contract_7319_Петров_Пётр.pdf");
    assert_eq!(text.pages, 1);
    assert!(pdf.pages >= 2);
}

// ===========================================================================
// Captured schedule
// ===========================================================================

/// Returns a fixed bitmap of the requested height.
struct Fixed {
    height: u32,
}

#[async_trait]
impl Rasterizer for Fixed {
    async fn rasterize(&self, _region: &RasterRegion) -> MicroloanResult<Bitmap> {
        Bitmap::from_rgb(600, self.height, vec![255; 600 * self.height as usize * 3])
    }
}

struct Failing;

#[async_trait]
impl Rasterizer for Failing {
    async fn rasterize(&self, region: &RasterRegion) -> MicroloanResult<Bitmap> {
        Err(MicroloanError::RenderFailed(format!("{} is not on screen", region.id)))
    }
}

#[tokio::test]
async fn test_capture_is_sliced_across_pages() {
    let exporter = ArtifactExporter::default();
    let params = LoanParameters::new(50_000, 30, dec!(0.02));

    let artifact = exporter
        .build_schedule_capture(&params, &Fixed { height: 2_400 }, &RasterRegion::new("schedule"))
        .await
        .unwrap();

    assert_eq!(artifact.file_name, "Schedule_50000_30days.pdf");
    // 2400px at 600px wide scales to about 1928pt of a 728pt printable height.
    assert_eq!(artifact.pages, 3);
    let images = artifact
        .bytes
        .windows(b"/Subtype /Image".len())
        .filter(|w| *w == b"/Subtype /Image")
        .count();
    assert_eq!(images, 1);
}

#[tokio::test]
async fn test_capture_failure_is_reported() {
    let exporter = ArtifactExporter::default();
    let params = LoanParameters::new(50_000, 30, dec!(0.02));

    let result = exporter
        .build_schedule_capture(&params, &Failing, &RasterRegion::new("schedule"))
        .await;

    match result {
        Err(MicroloanError::RenderFailed(msg)) => assert!(msg.contains("schedule")),
        other => panic!("expected render failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_capture_checks_parameters_before_rasterizing() {
    let exporter = ArtifactExporter::default();
    let params = LoanParameters::new(50_000, 0, dec!(0.02));

    let result = exporter
        .build_schedule_capture(&params, &Failing, &RasterRegion::new("schedule"))
        .await;

    assert!(matches!(result, Err(MicroloanError::InvalidTerm(_))));
}
