use std::cell::Cell;
use std::ops;


// Remembers whether the value changed since the front end last painted it. A fresh value counts
// as changed, so the first frame always paints everything.
#[derive(Clone, Debug)]
pub struct Dirty<T> {
    value: T,
    dirty: Cell<bool>,
}

impl<T> Dirty<T> {
    pub fn new(value: T) -> Self { Self { value, dirty: Cell::new(true) } }

    pub fn get_mut(&mut self) -> &mut T {
        self.dirty.set(true);
        &mut self.value
    }

    pub fn is_dirty(&self) -> bool { self.dirty.get() }

    // Returns whether a repaint is needed and resets the flag.
    pub fn take_dirt(&self) -> bool { self.dirty.replace(false) }
}

impl<T: Eq> Dirty<T> {
    // Unchanged values leave the flag alone.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.dirty.set(true);
        }
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut value = self.value.clone();
        f(&mut value);
        self.set(value);
    }
}

impl<T> ops::Deref for Dirty<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target { &self.value }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirt_tracking() {
        let mut value = Dirty::new(vec![1]);
        assert!(value.take_dirt());
        assert!(!value.take_dirt());
        value.set(vec![1]);
        assert!(!value.is_dirty());
        value.update(|v| v.push(2));
        assert!(value.take_dirt());
        value.update(|_| {});
        assert!(!value.is_dirty());
        value.get_mut().clear();
        assert!(value.take_dirt());
        assert!(value.is_empty());
    }
}
