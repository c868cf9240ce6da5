/// Index-addressed entity arena with per-slot alive flags.
///
/// Systems mark entries dead with [`Pool::kill`] while iterating by index;
/// one [`Pool::compact`] pass per frame then drops every dead slot in O(n)
/// without giving back the allocation.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    alive: Vec<bool>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            items: Vec::new(),
            alive: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Pool {
            items: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
        }
    }

    /// Append a live entry and return its slot index.
    pub fn spawn(&mut self, item: T) -> usize {
        self.items.push(item);
        self.alive.push(true);
        self.items.len() - 1
    }

    /// Mark a slot dead.  Returns `true` only on the live → dead transition,
    /// so callers can award a removal exactly once.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.alive.get_mut(index) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.alive.get(index).copied().unwrap_or(false)
    }

    /// Number of slots, live or dead.  Use as the bound for index loops.
    pub fn slots(&self) -> usize {
        self.items.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.alive.iter().any(|&a| a)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if self.is_alive(index) {
            self.items.get(index)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_alive(index) {
            self.items.get_mut(index)
        } else {
            None
        }
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .zip(self.alive.iter())
            .filter_map(|(item, &alive)| alive.then_some(item))
    }

    /// Live entries in slot order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items
            .iter_mut()
            .zip(self.alive.iter())
            .filter_map(|(item, &alive)| alive.then_some(item))
    }

    /// Kill every live entry matching `remove`; returns how many died.
    pub fn kill_where(&mut self, mut remove: impl FnMut(&T) -> bool) -> usize {
        let mut killed = 0;
        for (item, alive) in self.items.iter().zip(self.alive.iter_mut()) {
            if *alive && remove(item) {
                *alive = false;
                killed += 1;
            }
        }
        killed
    }

    /// Drop all dead slots, preserving the order of live ones.
    pub fn compact(&mut self) {
        let mut write = 0;
        for read in 0..self.items.len() {
            if self.alive[read] {
                self.items.swap(write, read);
                write += 1;
            }
        }
        self.items.truncate(write);
        self.alive.clear();
        self.alive.resize(write, true);
    }

    /// Remove everything; capacity is kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.alive.clear();
    }
}

impl<T> Extend<T> for Pool<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.spawn(item);
        }
    }
}

impl<T> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pool = Pool::new();
        pool.extend(iter);
        pool
    }
}
