use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

// atomic counter so ids stay unique no matter which thread asks
pub fn next_binding_id() -> BindingId {
    BindingId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}
