/// Terminal-independent key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// Global key subscriptions. Each binding maps one key to an action until it
/// is unbound; the owner's drop tears all of them down.
#[derive(Debug)]
pub struct KeyBindings<A> {
    bindings: Vec<(BindingId, Key, A)>,
    next_id: u64,
}

impl<A> Default for KeyBindings<A> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A: Clone> KeyBindings<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: Key, action: A) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push((id, key, action));
        id
    }

    /// Swap the action of an existing binding
    pub fn rebind(&mut self, id: BindingId, action: A) -> bool {
        match self.bindings.iter_mut().find(|(binding, _, _)| *binding == id) {
            Some(entry) => {
                entry.2 = action;
                true
            }
            None => false,
        }
    }

    pub fn unbind(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|(binding, _, _)| *binding != id);
        self.bindings.len() != before
    }

    /// Actions bound to `key`, in binding order
    pub fn dispatch(&self, key: Key) -> Vec<A> {
        self.bindings
            .iter()
            .filter(|(_, bound, _)| *bound == key)
            .map(|(_, _, action)| action.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
