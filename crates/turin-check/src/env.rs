use fxhash::FxHashMap;
use turin_types::TypeUsage;

/// Types of the local names visible at some point of a body: variables,
/// parameters, catch variables and the program argument.
///
/// Scopes nest lexically. A name declared in an inner scope hides the same
/// name in the enclosing ones until the inner scope is popped.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    scopes: Vec<FxHashMap<String, TypeUsage>>,
}

impl Default for TypeEnv {
    fn default() -> Self {
        TypeEnv {
            scopes: vec![FxHashMap::default()],
        }
    }
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// The outermost scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn define(&mut self, name: impl Into<String>, type_usage: TypeUsage) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), type_usage);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeUsage> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_hides_outer() {
        let mut env = TypeEnv::new();
        env.define("x", TypeUsage::int());
        env.push_scope();
        env.define("x", TypeUsage::string());
        assert_eq!(env.lookup("x"), Some(&TypeUsage::string()));
        env.pop_scope();
        assert_eq!(env.lookup("x"), Some(&TypeUsage::int()));
    }

    #[test]
    fn test_popping_the_root_scope_is_ignored() {
        let mut env = TypeEnv::new();
        env.define("args", TypeUsage::array(TypeUsage::string()));
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.depth(), 1);
        assert!(env.lookup("args").is_some());
        assert!(env.lookup("missing").is_none());
    }
}
