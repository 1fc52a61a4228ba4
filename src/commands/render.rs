use crate::{RenderArgs, build::Builder, config::resolve_path};

use super::load_config;

pub async fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    let (config, base_path) = load_config(args.config_file.as_deref())?;

    // Host pages and --out are relative to where the command runs
    let cwd = std::env::current_dir()?;
    let hosts: Vec<_> = args
        .host_pages
        .iter()
        .map(|host| resolve_path(&cwd, host))
        .collect();
    let output_dir = resolve_path(&cwd, &args.out);

    let builder = Builder::new(config, base_path);
    let result = builder.render_hosts(&hosts, &output_dir)?;

    println!(
        "Prerendered {} page(s) to {}",
        result.pages,
        result.output_dir.display()
    );

    Ok(())
}
