use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::{json, Value};

use microloan_core::raster::{ImageFileRasterizer, RasterRegion};
use microloan_core::render::contract_number;
use microloan_core::{
    Artifact, ArtifactExporter, BorrowerData, ContractRequest, DirectoryTarget, ExportFormat,
};

use crate::commands::loan::LoanArgs;
use crate::input;

/// Arguments for contract export
#[derive(Args)]
pub struct ContractArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Path to a JSON file with the borrower's details
    #[arg(long)]
    pub borrower: String,

    /// Contract date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Contract number, defaults to one derived from the current time
    #[arg(long)]
    pub number: Option<u32>,

    /// pdf or txt
    #[arg(long, default_value = "pdf")]
    pub format: ExportFormat,

    /// Directory the file is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Arguments for schedule document export
#[derive(Args)]
pub struct ScheduleDocArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Date printed as the generation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// pdf or txt
    #[arg(long, default_value = "pdf")]
    pub format: ExportFormat,

    /// Slice a captured schedule image (PNG/JPEG) across PDF pages instead
    /// of typesetting the table
    #[arg(long)]
    pub capture: Option<PathBuf>,

    /// Identifier of the captured region, for diagnostics
    #[arg(long, default_value = "schedule")]
    pub region: String,

    /// Directory the file is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn run_contract(
    args: ContractArgs,
    config: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let exporter = ArtifactExporter::new(input::file::read_config(config)?)?;
    let borrower: BorrowerData = input::file::read_json(&args.borrower)?;
    let now = Local::now().naive_local();

    let request = ContractRequest {
        parameters: args.loan.resolve()?,
        borrower,
        contract_date: args.date.unwrap_or(now.date()),
        contract_number: args.number.unwrap_or_else(|| contract_number(now)),
    };

    let artifact = exporter.build_contract(&request, args.format)?;
    let path = exporter.export(&artifact, &mut DirectoryTarget::new(&args.out_dir))?;
    Ok(delivered(&artifact, &path))
}

pub fn run_schedule_doc(
    args: ScheduleDocArgs,
    config: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let exporter = ArtifactExporter::new(input::file::read_config(config)?)?;
    let params = args.loan.resolve()?;

    let artifact = match args.capture {
        Some(ref image) => {
            if args.format != ExportFormat::Pdf {
                return Err("--capture produces a PDF; drop --format or use --format pdf".into());
            }
            let rasterizer = ImageFileRasterizer::new(image);
            let region = RasterRegion::new(args.region.as_str());
            let runtime = tokio::runtime::Builder::new_current_thread().build()?;
            runtime.block_on(exporter.build_schedule_capture(&params, &rasterizer, &region))?
        }
        None => {
            let issued_on = args.date.unwrap_or_else(|| Local::now().date_naive());
            exporter.build_schedule(&params, issued_on, args.format)?
        }
    };

    let path = exporter.export(&artifact, &mut DirectoryTarget::new(&args.out_dir))?;
    Ok(delivered(&artifact, &path))
}

fn delivered(artifact: &Artifact, path: &std::path::Path) -> Value {
    json!({
        "result": {
            "file": path.display().to_string(),
            "document": artifact.document,
            "format": artifact.format,
            "media_type": artifact.media_type(),
            "pages": artifact.pages,
            "bytes": artifact.bytes.len(),
        }
    })
}
