use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Segment {
    #[default]
    None,
    Code,
    Data,
}

/// One symbol table entry. A label is either locally defined (code or data
/// segment) or external; never both.
#[derive(Debug, Clone, Default)]
pub struct Label {
    pub value: u32,
    pub segment: Segment,
    pub is_entry: bool,
    pub is_external: bool,
    /// Addresses of instructions that reference this symbol. Populated only
    /// for external symbols, after pass two.
    pub uses: Vec<u32>,
}

/// Symbol table for one translation unit. Insertion order is preserved and
/// defines the emission order of the entry/external export files.
#[derive(Debug, Default)]
pub struct Labels {
    map: IndexMap<String, Label>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` at `value` in `segment`. The first definition wins;
    /// returns `false` when the name is already present (locally defined or
    /// external) so the caller can diagnose the redefinition.
    pub fn define(&mut self, name: &str, value: u32, segment: Segment) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(
            name.to_string(),
            Label {
                value,
                segment,
                ..Default::default()
            },
        );
        true
    }

    /// Register `name` as external with address 0 and no use sites. Returns
    /// `false` when the name is already locally defined; re-declaring an
    /// existing external is allowed.
    pub fn declare_external(&mut self, name: &str) -> bool {
        match self.map.get(name) {
            Some(label) => label.is_external,
            None => {
                self.map.insert(
                    name.to_string(),
                    Label {
                        is_external: true,
                        ..Default::default()
                    },
                );
                true
            }
        }
    }

    /// Unknown names are a silent no-op; the validator reports the missing
    /// label on the `.entry` line itself.
    pub fn mark_entry(&mut self, name: &str) {
        if let Some(label) = self.map.get_mut(name) {
            label.is_entry = true;
        }
    }

    /// Append a use-site address. No-op for unknown or non-external names.
    pub fn record_use(&mut self, name: &str, addr: u32) {
        if let Some(label) = self.map.get_mut(name) {
            if label.is_external {
                label.uses.push(addr);
            }
        }
    }

    /// Rebase every data-segment symbol by the final code length. Called
    /// exactly once, after pass one; addresses are absolute afterwards.
    pub fn shift_data(&mut self, offset: u32) {
        for label in self.map.values_mut() {
            if label.segment == Segment::Data {
                label.value += offset;
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.map.get(name).map(|label| label.value)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.map.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Label> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
