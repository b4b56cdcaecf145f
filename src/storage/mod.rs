pub mod counter;

pub use counter::{
    CounterStore, InMemoryCounterStore, PostgresCounterStore, StoreError, LIKES_CEILING,
};
