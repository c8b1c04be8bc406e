//! Template rendering and output.
//!
//! Templates use Jinja syntax (via `minijinja`). The render context exposes
//! exactly two fields:
//!
//! - `codes`: every catalog code, ascending
//! - `version`: the generator version ([`crate::VERSION`])
//!
//! Descriptions are reached only through the `key(code)` function. The full
//! function table is `key`, `normalize`, `split`, `join`, `title` and `map`;
//! see [`crate::funcs`] for their rules.
//!
//! ```text
//! {% for code in codes %}
//! Error{{ join("", title(split(" ", normalize(key(code))))) }} = {{ code }}
//! {%- endfor %}
//! ```

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use tracing::{debug, info};

use crate::VERSION;
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::funcs::{self, MapMode};

/// Name under which the user template is registered, used in diagnostics.
const TEMPLATE_NAME: &str = "errors";

/// Values visible to the template.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    /// Catalog codes in ascending order.
    pub codes: Vec<i64>,
    /// Generator version string.
    pub version: &'static str,
}

/// Renders templates against a single catalog.
#[derive(Debug, Clone)]
pub struct Generator {
    catalog: Arc<Catalog>,
    map_mode: MapMode,
}

impl Generator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            map_mode: MapMode::default(),
        }
    }

    /// Select how the template `map` function shapes its output.
    pub fn with_map_mode(mut self, map_mode: MapMode) -> Self {
        self.map_mode = map_mode;
        self
    }

    pub fn context(&self) -> RenderContext {
        RenderContext {
            codes: self.catalog.codes(),
            version: VERSION,
        }
    }

    /// Render `template` and return the complete output.
    ///
    /// Fails with [`Error::Template`] on a syntax error or when the template
    /// references an undefined value or function.
    pub fn render(&self, template: &str) -> Result<String> {
        let env = self.environment();
        let tpl = env.template_from_named_str(TEMPLATE_NAME, template)?;
        let ctx = self.context();
        debug!(codes = ctx.codes.len(), "rendering template");
        let out = tpl.render(&ctx)?;
        Ok(out)
    }

    /// Build an environment with the function table bound to this catalog.
    fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        let catalog = Arc::clone(&self.catalog);
        env.add_function("key", move |code: i64| catalog.get(code).to_string());
        env.add_function("normalize", |desc: String| funcs::normalize(&desc));
        env.add_function("split", |separator: String, value: String| {
            funcs::split(&separator, &value)
        });
        env.add_function("join", |separator: String, values: Vec<String>| {
            funcs::join(&separator, &values)
        });
        env.add_function("title", |values: Vec<String>| funcs::title(&values));

        let mode = self.map_mode;
        env.add_function("map", move |from: String, to: String, values: Vec<String>| {
            funcs::map_values(mode, &from, &to, &values)
        });
        env
    }
}

/// Read a template file from disk.
pub fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write rendered output to `dest`, or to standard output when `None`.
///
/// A destination file is created (or truncated) only once the whole output
/// is available, so a failed render never leaves a partial file behind.
pub fn write_output(dest: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = dest else {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| Error::Write {
                path: "<stdout>".into(),
                source: e,
            });
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}
