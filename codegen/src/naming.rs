use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::GenError;
use protoclosure_descriptor::{EnumDescriptor, FileDescriptor, MessageDescriptor};

/// The output namespace of a file: the Closure namespace override if
/// declared, else the schema package, else none.
pub fn file_namespace(file: &FileDescriptor) -> Option<&str> {
    file.namespace.as_deref().or(file.package.as_deref())
}

/// Strip the absolute-path marker from a schema-qualified type path.
pub fn clean_type_name(type_name: &str) -> &str {
    type_name.strip_prefix('.').unwrap_or(type_name)
}

/// Join a parent qualifier and a local name with a dot.
pub fn concat_names(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}.{}", parent, clean_type_name(name)),
        _ => clean_type_name(name).to_string(),
    }
}

/// Maps every message and enum declaration of a compilation unit to its
/// fully qualified Closure name.
///
/// Nested declarations in different parents may share a local name, so the
/// primary map is keyed by descriptor identity (the address of the
/// declaration, pinned by the `'a` borrow of the descriptor set). A second
/// map keyed by the schema-qualified path resolves field type references.
/// Built once per compilation unit by a single pre-order walk; immutable
/// afterwards.
pub struct TypeNameMap<'a> {
    by_decl: HashMap<usize, String>,
    by_path: HashMap<String, String>,
    _descriptors: PhantomData<&'a FileDescriptor>,
}

fn identity<T>(decl: &T) -> usize {
    decl as *const T as usize
}

impl<'a> TypeNameMap<'a> {
    pub fn build(files: &'a [FileDescriptor]) -> TypeNameMap<'a> {
        let mut map = TypeNameMap {
            by_decl: HashMap::new(),
            by_path: HashMap::new(),
            _descriptors: PhantomData,
        };
        for file in files {
            let namespace = file_namespace(file);
            let package = file.package.as_deref();
            for message in &file.messages {
                map.insert_message(namespace, package, message);
            }
            for decl in &file.enums {
                map.insert_enum(namespace, package, decl);
            }
        }
        map
    }

    fn insert_message(
        &mut self,
        namespace: Option<&str>,
        schema_path: Option<&str>,
        message: &'a MessageDescriptor,
    ) {
        let type_name = concat_names(namespace, &message.name);
        let path = concat_names(schema_path, &message.name);
        self.by_decl.insert(identity(message), type_name.clone());
        self.by_path.insert(path.clone(), type_name.clone());
        for nested in &message.messages {
            self.insert_message(Some(&type_name), Some(&path), nested);
        }
        for decl in &message.enums {
            self.insert_enum(Some(&type_name), Some(&path), decl);
        }
    }

    fn insert_enum(
        &mut self,
        namespace: Option<&str>,
        schema_path: Option<&str>,
        decl: &'a EnumDescriptor,
    ) {
        let type_name = concat_names(namespace, &decl.name);
        self.by_decl.insert(identity(decl), type_name.clone());
        self.by_path
            .insert(concat_names(schema_path, &decl.name), type_name);
    }

    /// The fully qualified name of a message declaration. A miss means the
    /// declaration was not part of the walked descriptor set, which is an
    /// internal contract violation.
    pub fn for_message(&self, message: &MessageDescriptor) -> Result<&str, GenError> {
        self.by_decl
            .get(&identity(message))
            .map(String::as_str)
            .ok_or_else(|| {
                GenError::Internal(format!("Message {:?} is not in the type map", message.name))
            })
    }

    /// The fully qualified name of an enum declaration.
    pub fn for_enum(&self, decl: &EnumDescriptor) -> Result<&str, GenError> {
        self.by_decl
            .get(&identity(decl))
            .map(String::as_str)
            .ok_or_else(|| {
                GenError::Internal(format!("Enum {:?} is not in the type map", decl.name))
            })
    }

    /// Resolve a schema-qualified type path, as spelled by a field's type
    /// reference. A miss means the field references a declaration outside
    /// this compilation unit; the generator cannot know its output name, so
    /// this is a hard error.
    pub fn for_path(&self, type_path: &str) -> Result<&str, GenError> {
        self.by_path
            .get(clean_type_name(type_path))
            .map(String::as_str)
            .ok_or_else(|| GenError::UnresolvedType(type_path.to_string()))
    }
}
