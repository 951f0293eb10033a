//! Stencil's main application entry point.
//! Handles command-line argument parsing and hands the resolved template,
//! prompter and output directory to the library.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use stencil::{
    cli::{get_args, Command},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    metadata,
    processor::RenderEvent,
    prompt::{DialoguerPrompter, NoPrompter, Prompter},
    renderer::MiniJinjaRenderer,
    template::Template,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    let outcome = match args.command {
        Command::Use { template, output_dir, use_defaults, force } => {
            run_use(&template, &output_dir, use_defaults, force)
        }
        Command::Validate { template } => run_validate(&template),
    };

    if let Err(err) = outcome {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and force is false
pub fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// Generates a project.
///
/// # Flow
/// 1. Checks the output directory
/// 2. Loads the template and its context
/// 3. Renders the template, prompting unless `use_defaults` is set
/// 4. Persists the template metadata into the generated project
fn run_use(template_path: &Path, output_dir: &Path, use_defaults: bool, force: bool) -> anyhow::Result<()> {
    let output_root = get_output_dir(output_dir, force)?;
    let mut template = Template::get(template_path)
        .with_context(|| format!("cannot load template '{}'", template_path.display()))?;

    let prompter: Arc<dyn Prompter> = if use_defaults {
        template.use_default_values();
        Arc::new(NoPrompter)
    } else {
        Arc::new(DialoguerPrompter::new())
    };

    let renderer = MiniJinjaRenderer::new();
    template
        .execute(&output_root, prompter, &renderer, &mut |event| {
            if let RenderEvent::FileRendered(path) = event {
                println!("Created {}", path.display());
            }
        })
        .with_context(|| format!("cannot render into '{}'", output_root.display()))?;

    metadata::persist(&output_root, template.info())?;

    println!("Project generated successfully in {}.", output_root.display());
    Ok(())
}

fn run_validate(template_path: &Path) -> anyhow::Result<()> {
    let template = Template::get(template_path)
        .with_context(|| format!("cannot load template '{}'", template_path.display()))?;
    let checked = template.validate(&MiniJinjaRenderer::new())?;

    println!("Template is valid ({checked} entries checked).");
    Ok(())
}
