use clap::Parser;
use link_audit::{Audit, InputSource, analysis, render};
use std::error::Error;
use std::process::ExitCode;

mod args;
use args::{Args, FormatArg, convert_variant};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Report failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let source = InputSource::from_path(args.input.clone());
    ::log::info!("Starting link report for {:?}", source);

    let mut audit = Audit::new(source);
    if let Some(config_path) = &args.config {
        ::log::info!("Loading configuration from {}", config_path.display());
        audit = audit.with_config_file(config_path)?;
    }

    let run = audit
        .with_variant(convert_variant(args.variant))
        .with_include_patterns(args.include)
        .with_exclude_patterns(args.exclude)
        .with_required_domain(args.domain)
        .with_model(args.model)
        .with_max_tokens(args.max_tokens)
        .load()?;

    let report = run.report();
    match args.format {
        FormatArg::Text => {
            if run.is_demo() {
                println!("⚠️ Estos son datos de ejemplo. Pasa la ruta de tu CSV para ver tu informe real.\n");
            } else {
                println!(
                    "✅ Archivo cargado correctamente: {} enlaces encontrados\n",
                    run.records().len()
                );
            }
            print!("{}", render::text(&report));
        }
        FormatArg::Json => println!("{}", render::json(&report)?),
    }

    let mut session = run.session();
    let state = if args.analyze {
        run.analyze(&mut session).await
    } else {
        session.state()
    };

    match analysis::save(&state, &args.output_analysis) {
        Ok(true) => ::log::info!("Analysis saved to {}", args.output_analysis.display()),
        Ok(false) => {}
        Err(e) => ::log::error!(
            "Could not save analysis to {}: {}",
            args.output_analysis.display(),
            e
        ),
    }

    match args.format {
        FormatArg::Text => print!("{}", render::analysis(&state)),
        FormatArg::Json => {
            if args.analyze {
                eprint!("{}", render::analysis(&state));
            }
        }
    }

    Ok(())
}
