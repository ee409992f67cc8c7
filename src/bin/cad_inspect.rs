use cad_probe::inspect_file;
use cad_probe::utils::logger;
use cad_probe::utils::validation::allowed_file;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cad-inspect")]
#[command(about = "Inspect a local CAD file and print the same JSON the upload endpoint returns")]
struct Args {
    /// CAD file to inspect (.stl, .stp, .step, .igs, .iges)
    file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    if !allowed_file(&filename) {
        eprintln!("❌ File type not allowed: {}", args.file.display());
        eprintln!("💡 Use a .stl, .stp, .step, .igs or .iges file");
        std::process::exit(2);
    }

    tracing::info!("🔍 Inspecting {}", args.file.display());

    let inspection = match inspect_file(&args.file, &filename).await {
        Ok(inspection) => inspection,
        Err(e) => {
            tracing::error!("❌ Inspection failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&inspection)?
    } else {
        serde_json::to_string(&inspection)?
    };
    println!("{}", output);

    Ok(())
}
