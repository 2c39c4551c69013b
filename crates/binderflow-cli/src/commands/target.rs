use crate::cli::TargetArgs;
use crate::error::{CliError, Result};
use crate::target;
use crate::utils::parser;
use tracing::info;

pub async fn run(args: TargetArgs) -> Result<()> {
    let pdb_id =
        parser::parse_pdb_id(&args.pdb_id).map_err(|e| CliError::Argument(e.to_string()))?;

    let raw = if args.skip_download {
        let path = target::raw_path(&args.input_dir, &pdb_id);
        if !path.exists() {
            return Err(CliError::Target(format!(
                "{} not found. Run without --skip-download to fetch it.",
                path.display()
            )));
        }
        info!("Using existing structure at {:?}", path);
        path
    } else {
        println!("Downloading {} from RCSB...", pdb_id);
        let client = reqwest::Client::new();
        target::download_pdb(&client, target::RCSB_BASE_URL, &pdb_id, &args.input_dir).await?
    };

    let cleaned = target::cleaned_path(&args.input_dir, &pdb_id);
    let kept = target::clean_target(&raw, &cleaned)?;
    println!(
        "✓ Wrote {} ({} protein atom records)",
        cleaned.display(),
        kept
    );

    let ranges = target::chain_ranges(&cleaned)?;
    println!("Chains:");
    for range in &ranges {
        println!(
            "  {}: residues {}-{} ({} residues)",
            range.chain_id, range.first_residue, range.last_residue, range.residue_count
        );
    }
    println!("Target contigs: {}", target::contig_hint(&ranges));

    Ok(())
}
