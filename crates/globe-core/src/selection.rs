/// Receives the label of a marker selected by a click.
pub trait SelectionSink {
    fn on_select(&mut self, label: &str);
}

impl<F: FnMut(&str)> SelectionSink for F {
    fn on_select(&mut self, label: &str) {
        self(label)
    }
}

/// Label of the currently selected marker. A miss leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, label: &str) {
        self.selected = Some(label.to_string());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
