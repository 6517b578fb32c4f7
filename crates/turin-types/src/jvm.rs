use std::fmt;

/// A type descriptor in the platform's own notation (`I`, `Ljava/lang/String;`, `[D`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JvmType {
    descriptor: String,
}

impl JvmType {
    pub fn new(descriptor: impl Into<String>) -> Self {
        JvmType {
            descriptor: descriptor.into(),
        }
    }

    /// Descriptor of a class given its dotted qualified name.
    pub fn object(qualified_name: &str) -> Self {
        JvmType::new(format!("L{};", qualified_name.replace('.', "/")))
    }

    pub fn array_of(component: &JvmType) -> Self {
        JvmType::new(format!("[{}", component.descriptor))
    }

    pub fn void() -> Self {
        JvmType::new("V")
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}
