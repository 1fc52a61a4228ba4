use crate::{
    TidyArgs,
    config::resolve_path,
    diagrams::{DiagramDiscovery, extract::tidy_document},
};

use super::load_config;

pub async fn run(args: &TidyArgs) -> Result<(), anyhow::Error> {
    let (config, base_path) = load_config(args.config_file.as_deref())?;
    let diagrams = &config.diagrams;

    let root = resolve_path(&base_path, &diagrams.root);
    let sources = DiagramDiscovery::new(&root, &diagrams.file_name, &diagrams.subdir).discover()?;

    let mut changed = 0;
    for source in &sources {
        let text = tokio::fs::read_to_string(&source.path).await?;
        let tidied = tidy_document(&text);
        if tidied == text {
            tracing::debug!(path = %source.path.display(), "Already tidy");
            continue;
        }

        changed += 1;
        if args.dry_run {
            println!("Would sanitize {}", source.path.display());
        } else {
            tokio::fs::write(&source.path, tidied).await?;
            println!("Sanitized {}", source.path.display());
        }
    }

    println!(
        "{} of {} diagram source(s) {}",
        changed,
        sources.len(),
        if args.dry_run { "need tidying" } else { "tidied" }
    );

    Ok(())
}
