//! Configuration tables steering name resolution, pruning and emission.
//!
//! Tables are plain text, one record per line, fields separated by
//! whitespace. Lines starting with `//` and blank lines are skipped. A
//! missing table file is not an error, the table is just empty.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info, warn};

/// A set of names.
pub struct Table {
    set: HashSet<String>,
}

impl Table {
    pub fn from_data<I, S>(data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            set: data.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Self {
        let mut table = Self {
            set: HashSet::new(),
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!("Reading table {}", path.display());
                table.read(&text);
            }
            Err(_) => {
                warn!(
                    "Failed to open file {} for reading. No table data loaded",
                    path.display()
                );
            }
        }
        table
    }

    fn read(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let Some(name) = line.split_whitespace().next() else {
                continue;
            };
            debug!("\t{name}");
            self.set.insert(name.to_owned());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.set.contains(key)
    }
}

/// A mapping from names to names.
pub struct MappingTable {
    map: HashMap<String, String>,
}

impl MappingTable {
    pub fn from_data<I, K, V>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: data
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_file(path: &Path) -> Self {
        let mut table = Self {
            map: HashMap::new(),
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!("Reading mapping table {}", path.display());
                table.read(&text);
            }
            Err(_) => {
                warn!(
                    "Failed to open file {} for reading. No table data loaded",
                    path.display()
                );
            }
        }
        table
    }

    fn read(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(first), Some(second)) = (fields.next(), fields.next()) else {
                continue;
            };
            debug!("\t{first} -> {second}");
            self.map.insert(first.to_owned(), second.to_owned());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn find(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }

    pub fn substitute_if_exists(&self, key: &str, value: &mut String) {
        if let Some(v) = self.find(key) {
            *value = v.clone();
        }
    }
}

/// All tables used by the generator.
pub struct Tables {
    pub custom_types: MappingTable,
    pub type_substitutions: MappingTable,
    pub xsd_types: MappingTable,

    pub prune_list: Table,
    pub parent_pointers: Table,
    pub reserved_names: Table,
    pub fundamental_types: Table,
}

impl Tables {
    pub fn load(input_directory: &Path) -> Self {
        Self {
            custom_types: MappingTable::from_file(&input_directory.join("CustomTypes.txt")),
            type_substitutions: MappingTable::from_file(
                &input_directory.join("TypeSubstitution.txt"),
            ),
            xsd_types: MappingTable::from_data([
                ("xsd:byte", "int8_t"),
                ("xsd:unsignedByte", "uint8_t"),
                ("xsd:short", "int16_t"),
                ("xsd:unsignedShort", "uint16_t"),
                ("xsd:int", "int32_t"),
                ("xsd:unsignedInt", "uint32_t"),
                ("xsd:long", "int64_t"),
                ("xsd:unsignedLong", "uint64_t"),
                ("xsd:integer", "int"),
                ("xsd:boolean", "bool"),
                ("xsd:float", "float"),
                ("xsd:double", "double"),
                ("xsd:decimal", "double"),
                ("xsd:date", "std::time_t"),
                ("xsd:dateTime", "std::time_t"),
                ("xsd:time", "std::time_t"),
                ("xsd:string", "std::string"),
                ("xsd:ID", "std::string"),
                ("xsd:IDREF", "std::string"),
            ]),
            prune_list: Table::from_file(&input_directory.join("PruneList.txt")),
            parent_pointers: Table::from_file(&input_directory.join("ParentPointer.txt")),
            reserved_names: Table::from_data(C_PLUS_PLUS_KEYWORDS.iter().copied()),
            fundamental_types: Table::from_data([
                "std::string",
                "double",
                "bool",
                "int",
                "std::time_t",
            ]),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        // an empty directory yields empty file-based tables
        Self::load(Path::new(""))
    }
}

// from: http://en.cppreference.com/w/cpp/keyword
const C_PLUS_PLUS_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "atomic_cancel",
    "atomic_commit",
    "atomic_noexcept",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char16_t",
    "char32_t",
    "class",
    "compl",
    "concept",
    "const",
    "constexpr",
    "const_cast",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "import",
    "long",
    "module",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "requires",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "synchronized",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
    "xor",
    "xor_eq",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_skips_comments_and_blank_lines() {
        let mut table = Table {
            set: Default::default(),
        };
        table.read("// header\n\nCPACSWing extra tokens ignored\n  CPACSFuselage\n");
        assert!(table.contains("CPACSWing"));
        assert!(table.contains("CPACSFuselage"));
        assert!(!table.contains("extra"));
        assert!(!table.contains("// header"));
    }

    #[test]
    fn mapping_table_reads_two_columns() {
        let mut table = MappingTable {
            map: Default::default(),
        };
        table.read("// comment\nCPACSPoint CTiglPoint\nincomplete\n");
        assert_eq!(table.find("CPACSPoint").map(String::as_str), Some("CTiglPoint"));
        assert!(!table.contains("incomplete"));

        let mut value = "CPACSPoint".to_owned();
        table.substitute_if_exists("CPACSPoint", &mut value);
        assert_eq!(value, "CTiglPoint");
        table.substitute_if_exists("unknown", &mut value);
        assert_eq!(value, "CTiglPoint");
    }

    #[test]
    fn builtin_tables_are_installed() {
        let tables = Tables::default();
        assert_eq!(
            tables.xsd_types.find("xsd:string").map(String::as_str),
            Some("std::string")
        );
        assert!(tables.reserved_names.contains("class"));
        assert!(tables.fundamental_types.contains("std::time_t"));
        assert!(!tables.prune_list.contains("CPACSWing"));
    }
}
