//! Generate error code constants from a JSON error catalog.
//!
//! `errors-const` reads an error catalog (a JSON object of decimal error codes
//! to descriptions, optionally carrying `/* ... */` block comments) and renders
//! a user-supplied Jinja template against it, typically to emit one named
//! constant per error code in some target language.
//!
//! # Pipeline
//!
//! 1. [`catalog::parse_catalog`] strips block comments and parses the catalog
//! 2. [`catalog::Catalog::codes`] orders the codes ascending
//! 3. [`render::Generator::render`] evaluates the template with the
//!    [`funcs`] function table bound to the catalog
//! 4. [`render::write_output`] writes the result to a file or stdout
//!
//! Output is deterministic: the same catalog and template always produce
//! byte-identical text.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use errors_const::funcs::MapMode;
//!
//! let stats = errors_const::generate(
//!     "errors.json",
//!     Path::new("errors.go.tmpl"),
//!     Some(Path::new("errors.go")),
//!     MapMode::Substitute,
//! )?;
//! eprintln!("Generated {} constants", stats.codes_rendered);
//! # Ok::<(), errors_const::error::Error>(())
//! ```
//!
//! The stages can also be driven one at a time:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let catalog = errors_const::catalog::load_catalog(Path::new("errors.json"))?;
//! let template = errors_const::render::read_template(Path::new("errors.go.tmpl"))?;
//! let out = errors_const::render::Generator::new(catalog).render(&template)?;
//! errors_const::render::write_output(Some(Path::new("errors.go")), &out)?;
//! # Ok::<(), errors_const::error::Error>(())
//! ```

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::funcs::MapMode;
use crate::render::Generator;

pub mod catalog;
pub mod error;
pub mod funcs;
pub mod render;

/// Generator version exposed to templates as `version`.
pub const VERSION: &str = "0.1.0";

/// Statistics collected during generation for reporting.
#[derive(Debug, Default)]
pub struct GenerationStats {
    pub codes_rendered: usize,
    pub bytes_written: usize,
}

/// Run the whole pipeline: load the catalog, render `template` against it,
/// and write the result to `output` (stdout when `None`).
///
/// `catalog_source` is a file path, or an `http(s)://` URL with the `download`
/// feature. The first failing stage aborts the run and nothing is written.
pub fn generate(
    catalog_source: &str,
    template: &Path,
    output: Option<&Path>,
    map_mode: MapMode,
) -> Result<GenerationStats> {
    let template = render::read_template(template)?;
    let catalog = catalog::open_catalog(catalog_source)?;
    info!(codes = catalog.len(), "loaded error catalog");

    let codes_rendered = catalog.len();
    let out = Generator::new(catalog)
        .with_map_mode(map_mode)
        .render(&template)?;
    render::write_output(output, &out)?;

    Ok(GenerationStats {
        codes_rendered,
        bytes_written: out.len(),
    })
}
