use crate::{PagesArgs, build::Builder};

use super::load_config;

pub async fn run(args: &PagesArgs) -> Result<(), anyhow::Error> {
    let (config, base_path) = load_config(args.config_file.as_deref())?;

    let builder = Builder::new(config, base_path);
    let result = builder.build_pages(!args.no_prerender)?;

    if args.no_prerender {
        println!("Host pages left unrendered; run `patternbook render` to prerender them");
    } else {
        println!(
            "Prerendered {} page(s): {} interview question(s), {} outline entries",
            result.pages, result.qa_widgets, result.outline_entries
        );
    }

    Ok(())
}
