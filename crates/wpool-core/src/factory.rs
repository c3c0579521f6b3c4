//! `ValueFactory` — produces successive batches of input values.

/// A stateful producer of input values, invoked only from the producer
/// thread (so it needs no internal synchronization of its own).
///
/// `produce` is called with the current success count as a hint so a
/// factory can adapt its output — e.g. stop producing once the target is
/// close. An empty batch means "no more values, ever"; the producer thread
/// treats that as exhaustion and does not call `produce` again.
pub trait ValueFactory<V> {
    /// Produce the next batch of values, or an empty `Vec` if exhausted.
    fn produce(&mut self, current_successes: usize) -> Vec<V>;
}

impl<V, F> ValueFactory<V> for F
where
    F: FnMut(usize) -> Vec<V>,
{
    fn produce(&mut self, current_successes: usize) -> Vec<V> {
        self(current_successes)
    }
}

/// A factory that returns all of its values on the first call and an empty
/// batch on every call after.
pub struct AllAtOnceFactory<V> {
    values: Vec<V>,
    produced: bool,
}

impl<V> AllAtOnceFactory<V> {
    pub fn new(values: Vec<V>) -> Self {
        Self {
            values,
            produced: false,
        }
    }
}

impl<V> ValueFactory<V> for AllAtOnceFactory<V> {
    fn produce(&mut self, _current_successes: usize) -> Vec<V> {
        if self.produced {
            Vec::new()
        } else {
            self.produced = true;
            std::mem::take(&mut self.values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_at_once_yields_everything_then_empty() {
        let mut factory = AllAtOnceFactory::new(vec![1, 2, 3]);
        assert_eq!(factory.produce(0), vec![1, 2, 3]);
        assert_eq!(factory.produce(0), Vec::<i32>::new());
        assert_eq!(factory.produce(3), Vec::<i32>::new());
    }

    #[test]
    fn closure_factory_is_adaptive() {
        let mut remaining = vec![10, 20, 30, 40];
        let mut factory = move |successes: usize| {
            if successes >= 2 || remaining.is_empty() {
                Vec::new()
            } else {
                vec![remaining.remove(0)]
            }
        };
        assert_eq!(ValueFactory::produce(&mut factory, 0), vec![10]);
        assert_eq!(ValueFactory::produce(&mut factory, 1), vec![20]);
        assert_eq!(ValueFactory::produce(&mut factory, 2), Vec::<i32>::new());
    }
}
