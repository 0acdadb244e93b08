use super::AdvisoryDecoder;
use crate::error::{Error, Result};
use crate::model::{
    AdvisoryIndex, AdvisoryIndexEntry, AdvisoryRecord, AdvisoryTable, Diagnostic, Diagnostics,
};
use std::path::Path;
use tracing::{debug, trace};

/// Deepest `additional_packages` nesting accepted from a single advisory.
pub const MAX_PACKAGE_NESTING: usize = 16;

/// Decodes advisories written in the YAML database format.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl AdvisoryDecoder for YamlDecoder {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, raw: &str) -> Result<AdvisoryRecord> {
        let record: AdvisoryRecord = serde_yaml::from_str(raw)?;

        let depth = record.nesting_depth();
        if depth > MAX_PACKAGE_NESTING {
            return Err(Error::PackageNesting {
                depth,
                limit: MAX_PACKAGE_NESTING,
            });
        }

        Ok(record)
    }
}

/// Builds the advisory table and module index in a single pass.
pub struct AdvisoryLoader<D = YamlDecoder> {
    decoder: D,
}

impl AdvisoryLoader<YamlDecoder> {
    pub fn new() -> Self {
        Self {
            decoder: YamlDecoder,
        }
    }
}

impl Default for AdvisoryLoader<YamlDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AdvisoryDecoder> AdvisoryLoader<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// Loads every source, in iteration order.
    ///
    /// Sources that fail to decode are skipped and recorded in
    /// `diagnostics`; they never abort the load. When two sources map to
    /// the same identifier the later one replaces the earlier one in the
    /// table, while the index keeps one entry per decoded source.
    pub fn load<I, N, T>(
        &self,
        sources: I,
        diagnostics: &mut Diagnostics,
    ) -> (AdvisoryTable, AdvisoryIndex)
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table = AdvisoryTable::new();
        let mut index = AdvisoryIndex::new();

        for (name, raw) in sources {
            let name = name.as_ref();

            let record = match self.decoder.decode(raw.as_ref()) {
                Ok(record) => record,
                Err(e) => {
                    debug!(source = name, format = self.decoder.format(), error = %e, "Skipping advisory");
                    diagnostics.push(Diagnostic::MalformedAdvisory {
                        source: name.to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let id = derive_identifier(name);
            let entry = AdvisoryIndexEntry::new(id.clone(), &record);
            let module = record.module.clone();

            if table.insert(id.clone(), record).is_some() {
                debug!(source = name, id = %id, "Advisory identifier overwritten");
            }

            trace!(id = %id, module = %module, "Indexed advisory");
            index.entry(module).or_default().push(entry);
        }

        (table, index)
    }
}

/// Loads advisories with the default YAML decoder.
///
/// # Example
///
/// ```
/// use vulnmap::advisory::load_all;
/// use vulnmap::Diagnostics;
///
/// let sources = vec![
///     ("db/GO-2022-0001.yaml", "module: example.com/a\n"),
///     ("db/GO-2022-0002.yaml", "module: [unterminated\n"),
/// ];
///
/// let mut diagnostics = Diagnostics::new();
/// let (table, _index) = load_all(sources, &mut diagnostics);
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub fn load_all<I, N, T>(sources: I, diagnostics: &mut Diagnostics) -> (AdvisoryTable, AdvisoryIndex)
where
    I: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: AsRef<str>,
{
    AdvisoryLoader::new().load(sources, diagnostics)
}

/// Derives an advisory identifier from its source name.
///
/// Takes the final path segment, strips a trailing `.yaml`, then strips a
/// trailing `.yml` as a separate step. A name ending in `.yaml.yml` therefore
/// keeps its `.yaml`.
///
/// ```
/// use vulnmap::advisory::derive_identifier;
///
/// assert_eq!(derive_identifier("db/CVE-2021-1234.yaml"), "CVE-2021-1234");
/// assert_eq!(derive_identifier("db/CVE-2021-1234.yaml.yml"), "CVE-2021-1234.yaml");
/// ```
pub fn derive_identifier(source_name: &str) -> String {
    let base = Path::new(source_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(source_name);

    let base = base.strip_suffix(".yaml").unwrap_or(base);
    let base = base.strip_suffix(".yml").unwrap_or(base);
    base.to_string()
}
