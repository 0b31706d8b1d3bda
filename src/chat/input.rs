/// The text field the user types into.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputField {
    value: String,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

impl From<&str> for InputField {
    fn from(value: &str) -> Self {
        Self { value: value.to_string() }
    }
}
