// modbridge CLI entry point
use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;
use std::str::FromStr;

use modbridge_cli::{
    Cli, Commands, ConvertArgs, get_version, load_mapping_table, render_summary, run_check,
    run_convert, write_outcome,
};
use modbridge_ir::LoaderVariant;
use modbridge_transpiler::CompromiseStrategies;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            mappings,
            mod_id,
            loader,
            api_version,
            no_stubs,
            strict,
            allow_simplifications,
        }) => {
            let loader = LoaderVariant::from_str(&loader).map_err(anyhow::Error::msg)?;
            let strategies = CompromiseStrategies {
                allow_stubs: !no_stubs,
                allow_warnings: !strict,
                allow_simplifications,
            };
            let outcome = run_convert(&ConvertArgs {
                input: Path::new(&input),
                mappings: mappings.as_deref().map(Path::new),
                mod_id: mod_id.as_deref(),
                loader,
                api_version,
                strategies,
            })?;
            write_outcome(Path::new(&output), &outcome)?;
            println!("{}", render_summary(&outcome));
            if !outcome.success {
                bail!("conversion failed; see {}/report.json", output);
            }
        }
        Some(Commands::Check {
            input,
            mod_id,
            loader,
        }) => {
            let loader = LoaderVariant::from_str(&loader).map_err(anyhow::Error::msg)?;
            let summary = run_check(Path::new(&input), mod_id.as_deref(), loader)?;
            println!("{summary}");
        }
        Some(Commands::Mappings {
            mappings,
            signature,
            api_version,
        }) => {
            let table = load_mapping_table(mappings.as_deref().map(Path::new))?;
            match signature {
                Some(signature) => match table.resolve(&signature, api_version) {
                    Some(mapping) => {
                        println!(
                            "{} @ v{} -> {} ({:?})",
                            mapping.source_signature,
                            mapping.version,
                            mapping.target_equivalent,
                            mapping.conversion_type,
                        );
                        if let Some(notes) = &mapping.notes {
                            println!("  {notes}");
                        }
                    }
                    None => bail!("no mapping for '{signature}' at version {api_version}"),
                },
                None => {
                    println!("{} mapping(s)", table.len());
                    for signature in table.signatures() {
                        println!("  {signature}");
                    }
                }
            }
        }
        Some(Commands::Version) | None => {
            println!("{}", get_version());
        }
    }
    Ok(())
}
