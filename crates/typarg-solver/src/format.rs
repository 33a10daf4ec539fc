//! Type formatting for diagnostics.
//!
//! - plain types and type parameters: `Cat`, `T`
//! - instantiations: `Dictionary<string, List<int>>`
//! - open generic definitions: `Dictionary<_, _>`

use crate::db::TypeDatabase;
use crate::types::TypeId;
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    pub fn format_list(&self, ids: &[TypeId]) -> Vec<String> {
        ids.iter().map(|&id| self.format(id)).collect()
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        let Some(data) = self.db.lookup(id) else {
            let _ = write!(out, "<unknown #{}>", id.0);
            return;
        };
        out.push_str(self.db.resolve_atom(data.name));
        if !data.is_generic() {
            return;
        }

        out.push('<');
        for (i, &arg) in data.generic_args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if data.is_generic_definition() {
                out.push('_');
            } else {
                self.write_type(out, arg);
            }
        }
        out.push('>');
    }
}
