//! Runtime record-type synthesis
//!
//! Projections over anonymous-object literals need a schema that does not
//! exist until the expression is built. The registry synthesizes one
//! [`RecordType`] per request and keeps it alive for the lifetime of the
//! process; a global instance backs anonymous projections, and callers can
//! hold their own registry for isolation.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Field, RecordType, Ty};

/// Process-wide registry used by anonymous projections
static GLOBAL: Lazy<RecordTypeRegistry> = Lazy::new(RecordTypeRegistry::new);

/// Synthesizes and retains record schemas
#[derive(Debug, Default)]
pub struct RecordTypeRegistry {
    types: Mutex<Vec<Arc<RecordType>>>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static RecordTypeRegistry {
        &GLOBAL
    }

    /// Synthesize a new record schema from parallel name/type lists.
    ///
    /// Every call produces a distinct schema even for identical shapes;
    /// nominal identity is what the expression layer keys on.
    pub fn create_type(
        &self,
        name: &str,
        field_names: &[String],
        field_types: &[Ty],
    ) -> Result<Arc<RecordType>> {
        if field_names.len() != field_types.len() {
            return Err(Error::InputValidation(format!(
                "field name and type counts differ: {} names, {} types",
                field_names.len(),
                field_types.len()
            )));
        }
        let fields = field_names
            .iter()
            .zip(field_types)
            .map(|(n, t)| Field::new(n.clone(), t.clone()))
            .collect();
        let ty = RecordType::new(name, fields);
        self.types.lock().unwrap().push(Arc::clone(&ty));
        Ok(ty)
    }
}
