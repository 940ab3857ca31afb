//! Format routing: validates a request against the rule table and hands it
//! to the adapter registered for its route.

use crate::error::{AdapterError, Error, Result};
use crate::rules::ConversionRules;
use crate::types::{extension_of, ConversionRequest, FileFormat, FormatCategory};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A validated conversion handed to an adapter.
#[derive(Debug, Clone, Copy)]
pub struct ConversionJob<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    pub source_format: FileFormat,
    pub target: FileFormat,
}

/// Performs the actual conversion for one route.
///
/// Implementations read `job.source` and write `job.output`; they do not
/// need to check the rule table or create directories.
pub trait Adapter: Send + Sync {
    fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError>;
}

/// How a successful request was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMethod {
    /// Source and target share a format; the bytes were copied.
    Copied,
    /// The adapter for this route produced the output.
    Converted(FormatCategory),
}

/// Summary of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReport {
    pub source_format: FileFormat,
    pub target: FileFormat,
    pub method: ConversionMethod,
}

/// A request that passed validation, before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plan {
    source_format: FileFormat,
    target: FileFormat,
    route: FormatCategory,
}

/// Dispatches conversion requests by format.
///
/// Holds the rule table and one adapter per route. Both are immutable once
/// built, so a router can be shared across threads behind an `Arc`.
#[derive(Clone)]
pub struct Router {
    rules: Arc<ConversionRules>,
    adapters: HashMap<FormatCategory, Arc<dyn Adapter>>,
}

impl Router {
    /// Create a router with no adapters registered.
    pub fn new(rules: impl Into<Arc<ConversionRules>>) -> Self {
        Self {
            rules: rules.into(),
            adapters: HashMap::new(),
        }
    }

    /// Register the adapter for a route, replacing any previous one.
    pub fn with_adapter(mut self, route: FormatCategory, adapter: impl Adapter + 'static) -> Self {
        self.adapters.insert(route, Arc::new(adapter));
        self
    }

    /// The rule table this router enforces.
    pub fn rules(&self) -> &ConversionRules {
        &self.rules
    }

    /// Targets the rule table allows for a source file, in table order.
    ///
    /// Empty when the file does not exist or its extension is unknown.
    pub fn supported_targets(&self, source: &Path) -> Vec<FileFormat> {
        if !source.exists() {
            return Vec::new();
        }
        self.rules.targets_for(&extension_of(source)).to_vec()
    }

    /// Convert `source` into `output` as `target`.
    pub fn convert(
        &self,
        source: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target: &str,
    ) -> Result<ConversionReport> {
        let request = ConversionRequest::new(source.as_ref(), output.as_ref(), target);
        self.execute(&request)
    }

    /// Run a conversion request.
    ///
    /// Rejected requests (missing source, unknown extension, pair not in the
    /// rule table) fail before the output path or its directory is touched.
    pub fn execute(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        let plan = self.plan(request)?;

        log::debug!(
            "Converting {} ({}) to {} via {} route",
            request.source.display(),
            plan.source_format,
            plan.target,
            plan.route
        );

        let result = self.run(request, &plan);
        match &result {
            Ok(report) => log::info!(
                "Converted {} -> {} ({:?})",
                request.source.display(),
                request.output.display(),
                report.method
            ),
            Err(e) => log::error!("Conversion of {} failed: {}", request.source.display(), e),
        }
        result
    }

    /// Validate a request without side effects.
    fn plan(&self, request: &ConversionRequest) -> Result<Plan> {
        if !request.source.exists() {
            return Err(Error::SourceNotFound(request.source.clone()));
        }

        let extension = request.source_extension();
        let source_format = FileFormat::from_extension(&extension)
            .ok_or_else(|| Error::unsupported(&extension, &request.target))?;

        let target: FileFormat = request
            .target
            .parse()
            .map_err(|_| Error::unsupported(&extension, &request.target))?;

        // Only extensions the table lists are sources, even for a same-format copy.
        if self.rules.targets_for(&extension).is_empty()
            || (target != source_format && !self.rules.allows(&extension, target))
        {
            return Err(Error::unsupported(&extension, &request.target));
        }

        Ok(Plan {
            source_format,
            target,
            route: FormatCategory::route(source_format, target),
        })
    }

    fn run(&self, request: &ConversionRequest, plan: &Plan) -> Result<ConversionReport> {
        let fail = |source: AdapterError| Error::AdapterFailure {
            route: plan.route,
            target: plan.target.to_string(),
            source,
        };

        if let Some(dir) = request.output.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| fail(Box::new(e)))?;
            }
        }

        if plan.target == plan.source_format {
            fs::copy(&request.source, &request.output).map_err(|e| fail(Box::new(e)))?;
            return Ok(ConversionReport {
                source_format: plan.source_format,
                target: plan.target,
                method: ConversionMethod::Copied,
            });
        }

        let adapter = self
            .adapters
            .get(&plan.route)
            .ok_or_else(|| fail(format!("no adapter registered for the {} route", plan.route).into()))?;

        let job = ConversionJob {
            source: &request.source,
            output: &request.output,
            source_format: plan.source_format,
            target: plan.target,
        };
        adapter.convert(&job).map_err(fail)?;

        Ok(ConversionReport {
            source_format: plan.source_format,
            target: plan.target,
            method: ConversionMethod::Converted(plan.route),
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<String> = self.adapters.keys().map(|r| r.to_string()).collect();
        routes.sort();
        f.debug_struct("Router")
            .field("rules", &self.rules)
            .field("routes", &routes)
            .finish()
    }
}
