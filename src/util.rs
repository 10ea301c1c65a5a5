use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl Location {
    pub fn new(start: usize, end: usize) -> Location {
        Location { start, end }
    }

    /// Span for terms that are built in code rather than read from
    /// any source text.
    pub fn synthetic() -> Location {
        Location { start: 0, end: 0 }
    }
}

#[derive(Clone)]
pub struct Located<T> {
    pub location: Location,
    pub data: T,
}

impl<T> Located<T> {
    pub fn new(location: Location, data: T) -> Located<T> {
        Located { location, data }
    }
}

/// A persistent map from names to whatever a pass tracks for them.
/// Extending produces a new map, so sibling scopes never see each
/// other's bindings.
#[derive(Clone)]
pub struct Env<A> {
    map: HashMap<String, A>,
}

impl<A> Env<A> {
    pub fn get(&self, name: &str) -> Option<&A> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

impl<A: Clone> Env<A> {
    pub fn with(&self, name: &str, a: A) -> Env<A> {
        let mut map = self.map.clone();
        map.insert(name.to_string(), a);

        Env { map }
    }
}

impl<A> Default for Env<A> {
    fn default() -> Self {
        Env {
            map: HashMap::new(),
        }
    }
}

/// Picks a name that is not already bound in the environment, by
/// priming the name until it is free. The discard name is left alone;
/// nothing ever refers to it.
pub fn freshen<A>(env: &Env<A>, name: &str) -> String {
    if name == "_" {
        return name.to_string();
    }

    let mut name = name.to_string();
    while env.contains(&name) {
        name.push('\'');
    }
    name
}

/// A deferred computation that remembers its result. Forcing twice
/// runs the computation once; clones share the same cell.
pub struct Lazy<T>(Rc<RefCell<LazyCell<T>>>);

enum LazyCell<T> {
    Suspended(Rc<dyn Fn() -> T>),
    Forced(T),
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Lazy(self.0.clone())
    }
}

impl<T: Clone> Lazy<T> {
    pub fn new(f: impl Fn() -> T + 'static) -> Lazy<T> {
        Lazy(Rc::new(RefCell::new(LazyCell::Suspended(Rc::new(f)))))
    }

    /// Wraps a value that has already been computed.
    pub fn of(value: T) -> Lazy<T> {
        Lazy(Rc::new(RefCell::new(LazyCell::Forced(value))))
    }

    pub fn force(&self) -> T {
        let f = match &*self.0.borrow() {
            LazyCell::Forced(value) => return value.clone(),
            LazyCell::Suspended(f) => f.clone(),
        };

        // the borrow is released before the thunk runs, since the
        // computation may force other cells
        let value = f();
        *self.0.borrow_mut() = LazyCell::Forced(value.clone());
        value
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{freshen, Env, Lazy};

    #[test]
    fn env_with_shadows() {
        let env = Env::default().with("x", 1);
        let env2 = env.with("x", 2);

        assert_eq!(env.get("x"), Some(&1));
        assert_eq!(env2.get("x"), Some(&2));
    }

    #[test]
    fn env_get_missing() {
        let env: Env<i32> = Env::default();

        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn freshen_primes_taken_names() {
        let env = Env::default().with("x", ()).with("x'", ());

        assert_eq!(freshen(&env, "x"), "x''");
    }

    #[test]
    fn freshen_leaves_discards_alone() {
        let env = Env::default().with("_", ());

        assert_eq!(freshen(&env, "_"), "_");
    }

    #[test]
    fn lazy_forces_once() {
        let runs = Rc::new(Cell::new(0));
        let runs1 = runs.clone();
        let lazy = Lazy::new(move || {
            runs1.set(runs1.get() + 1);
            42
        });

        assert_eq!(lazy.force(), 42);
        assert_eq!(lazy.clone().force(), 42);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn lazy_of_is_already_forced() {
        let lazy = Lazy::of("hello");

        assert_eq!(lazy.force(), "hello");
    }
}
