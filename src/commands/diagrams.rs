use crate::{
    DiagramsArgs,
    config::{Isolation, resolve_path},
    diagrams::{ChromiumEngine, DiagramBatch, DiagramDiscovery, OutputWriter, session::RenderTimings},
};

use super::load_config;

pub async fn run(args: &DiagramsArgs) -> Result<(), anyhow::Error> {
    let (mut config, base_path) = load_config(args.config_file.as_deref())?;
    if args.shared_context {
        config.diagrams.isolation = Isolation::Shared;
    }
    let diagrams = &config.diagrams;

    // Step 1: Find the diagram sources
    let root = resolve_path(&base_path, &diagrams.root);
    let sources = DiagramDiscovery::new(&root, &diagrams.file_name, &diagrams.subdir).discover()?;
    println!("Found {} UML files", sources.len());
    if sources.is_empty() {
        return Ok(());
    }

    // Step 2: Prepare the output directory and the engine
    let writer = OutputWriter::create(&resolve_path(&base_path, &diagrams.output))?;
    let executable = diagrams
        .chrome_executable
        .as_ref()
        .map(|path| resolve_path(&base_path, path));
    let engine = ChromiumEngine::launch(executable.as_deref()).await?;

    // Step 3: Render every job
    let batch = DiagramBatch {
        engine_url: diagrams.engine_url.clone(),
        timings: RenderTimings::from_config(diagrams),
        isolation: diagrams.isolation,
        clean_source: diagrams.clean_source,
    };
    let report = batch.run(engine, &sources, &writer).await;

    println!(
        "Rendered {} of {} diagram(s) to {} ({} svg, {} png, {} skipped, {} failed)",
        report.rendered(),
        report.found,
        writer.dir().display(),
        report.svg,
        report.png,
        report.skipped,
        report.failed
    );

    Ok(())
}
