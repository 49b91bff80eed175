/// A property/value pair, as produced by the composite generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Attaches this property to a selector.
    pub fn scoped(self, selector: &str) -> Declaration {
        Declaration {
            selector: selector.to_string(),
            name: self.name,
            value: self.value,
        }
    }
}

/// A property/value pair plus the selector it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub selector: String,
    pub name: String,
    pub value: String,
}

impl Declaration {
    pub fn property(&self) -> Property {
        Property::new(self.name.clone(), self.value.clone())
    }
}
