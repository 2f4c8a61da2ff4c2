//! Opaque-handle C interface over integer-valued rankings.
//!
//! Every function returns a status code and writes results through out
//! parameters; nothing unwinds across the boundary. A ranking is handed to
//! C callers as an opaque pointer that must be released with
//! [`rb_ranking_free`]. Callbacks receive a caller-supplied context
//! pointer and report failure by returning a non-ok status, which the
//! library surfaces as [`RbStatus::CallbackError`] at the force that runs
//! them.
//!
//! Infinite ranks cross the boundary as `u64::MAX`.

use std::os::raw::{c_int, c_void};

use crate::error::{Error, Result};
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};

/// Status codes returned by every C-interface function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbStatus {
    /// Operation completed successfully.
    Ok = 0,
    /// A pointer argument was null or an input was otherwise invalid.
    InvalidArgument = 1,
    /// Allocation failed while constructing a ranking.
    AllocationFailure = 2,
    /// A user-provided callback reported an error.
    CallbackError = 3,
    /// The provided buffer was too small for the requested prefix.
    InsufficientBuffer = 4,
    /// Lazy evaluation failed in a way the C surface cannot express.
    InternalError = 100,
}

/// Opaque ranking handle for C callers.
pub struct RbRanking {
    inner: Ranking<i32>,
}

/// Callback transforming one value; writes the result through `output`.
pub type RbMapCallback =
    Option<unsafe extern "C" fn(input: c_int, context: *mut c_void, output: *mut c_int) -> RbStatus>;

/// Callback deciding whether to keep a value; writes 0 (drop) or non-zero
/// (keep) through `keep`.
pub type RbFilterCallback =
    Option<unsafe extern "C" fn(input: c_int, context: *mut c_void, keep: *mut c_int) -> RbStatus>;

/// A callback plus its context pointer, carried into lazy closures.
///
/// The library itself runs a callback from at most one thread at a time
/// (each suspension fires once), but handles may be forced from any
/// thread, so the caller must ensure the callback and context tolerate
/// being invoked from threads other than the constructing one.
struct CallbackState<F> {
    callback: F,
    context: *mut c_void,
}

unsafe impl<F> Send for CallbackState<F> {}
unsafe impl<F> Sync for CallbackState<F> {}

fn status_of(err: &Error) -> RbStatus {
    match err {
        Error::Callback(_) => RbStatus::CallbackError,
        Error::InsufficientBuffer { .. } => RbStatus::InsufficientBuffer,
        Error::InvalidArgument(_)
        | Error::RankOutOfRange(_)
        | Error::NotFinite
        | Error::ContractViolation(_) => RbStatus::InvalidArgument,
        Error::RankOverflow | Error::RankUnderflow => RbStatus::InternalError,
    }
}

fn into_handle(ranking: Ranking<i32>, out: *mut *mut RbRanking) -> RbStatus {
    let handle = Box::new(RbRanking { inner: ranking });
    // Null out-pointer was checked by the caller.
    unsafe {
        *out = Box::into_raw(handle);
    }
    RbStatus::Ok
}

unsafe fn borrow<'a>(handle: *const RbRanking) -> Option<&'a Ranking<i32>> {
    handle.as_ref().map(|h| &h.inner)
}

fn rank_to_u64(rank: Rank) -> u64 {
    rank.value_or(u64::MAX)
}

/// Create a single-element ranking at rank 0.
///
/// # Safety
/// `out_ranking` must be a valid pointer to writable storage.
#[no_mangle]
pub unsafe extern "C" fn rb_singleton_int(
    value: c_int,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    if out_ranking.is_null() {
        return RbStatus::InvalidArgument;
    }
    into_handle(Ranking::singleton(value, Rank::ZERO), out_ranking)
}

/// Create a ranking from parallel arrays of values and ranks. If `ranks`
/// is null, ranks are assigned sequentially starting at zero.
///
/// # Safety
/// `values` must point to `count` readable elements; `ranks` must be null
/// or point to `count` readable elements; `out_ranking` must point to
/// writable storage.
#[no_mangle]
pub unsafe extern "C" fn rb_from_array_int(
    values: *const c_int,
    ranks: *const u64,
    count: usize,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    if out_ranking.is_null() || (count > 0 && values.is_null()) {
        return RbStatus::InvalidArgument;
    }
    if count == 0 {
        return into_handle(
            Ranking::from_head(None, Deduplication::Enabled),
            out_ranking,
        );
    }
    let values = std::slice::from_raw_parts(values, count);
    let ranks = if ranks.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts(ranks, count))
    };
    let mut pairs = Vec::with_capacity(count);
    for (index, &value) in values.iter().enumerate() {
        let raw_rank = match ranks {
            Some(ranks) => ranks[index],
            None => index as u64,
        };
        let rank = match Rank::from_value(raw_rank) {
            Ok(rank) => rank,
            Err(err) => return status_of(&err),
        };
        pairs.push((value, rank));
    }
    into_handle(Ranking::from_list(pairs, Deduplication::Enabled), out_ranking)
}

fn run_map_callback(
    state: &CallbackState<unsafe extern "C" fn(c_int, *mut c_void, *mut c_int) -> RbStatus>,
    input: c_int,
) -> Result<c_int> {
    let mut output: c_int = 0;
    let status = unsafe { (state.callback)(input, state.context, &mut output) };
    if status == RbStatus::Ok {
        Ok(output)
    } else {
        Err(Error::callback(format!(
            "map callback returned status {status:?}"
        )))
    }
}

/// Transform every value through a callback. Lazy: the callback runs when
/// elements are first materialized, and a failing callback surfaces as
/// [`RbStatus::CallbackError`] from the materializing call.
///
/// # Safety
/// `ranking` must be a live handle from this interface and `out_ranking`
/// writable. The callback/context pair must tolerate invocation from the
/// thread that later materializes the result.
#[no_mangle]
pub unsafe extern "C" fn rb_map_int(
    ranking: *const RbRanking,
    callback: RbMapCallback,
    context: *mut c_void,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    let (Some(source), Some(callback)) = (borrow(ranking), callback) else {
        return RbStatus::InvalidArgument;
    };
    if out_ranking.is_null() {
        return RbStatus::InvalidArgument;
    }
    let state = CallbackState { callback, context };
    let mapped = source.map(
        move |value| run_map_callback(&state, *value),
        Deduplication::Enabled,
    );
    into_handle(mapped, out_ranking)
}

/// Keep only the values the callback approves. The callback runs eagerly
/// up to the first survivor, then lazily.
///
/// # Safety
/// As [`rb_map_int`].
#[no_mangle]
pub unsafe extern "C" fn rb_filter_int(
    ranking: *const RbRanking,
    callback: RbFilterCallback,
    context: *mut c_void,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    let (Some(source), Some(callback)) = (borrow(ranking), callback) else {
        return RbStatus::InvalidArgument;
    };
    if out_ranking.is_null() {
        return RbStatus::InvalidArgument;
    }
    let state = CallbackState { callback, context };
    let filtered = source.filter(
        move |value| {
            let state = &state;
            let mut keep: c_int = 0;
            let status = unsafe { (state.callback)(*value, state.context, &mut keep) };
            if status == RbStatus::Ok {
                Ok(keep != 0)
            } else {
                Err(Error::callback(format!(
                    "filter callback returned status {status:?}"
                )))
            }
        },
        Deduplication::Enabled,
    );
    match filtered {
        Ok(filtered) => into_handle(filtered, out_ranking),
        Err(err) => status_of(&err),
    }
}

/// Merge two rankings in rank order (left wins ties).
///
/// # Safety
/// `lhs` and `rhs` must be live handles and `out_ranking` writable.
#[no_mangle]
pub unsafe extern "C" fn rb_merge_int(
    lhs: *const RbRanking,
    rhs: *const RbRanking,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    let (Some(a), Some(b)) = (borrow(lhs), borrow(rhs)) else {
        return RbStatus::InvalidArgument;
    };
    if out_ranking.is_null() {
        return RbStatus::InvalidArgument;
    }
    into_handle(a.merge(b, Deduplication::Enabled), out_ranking)
}

/// Condition a ranking on equality with `value` and renormalize.
///
/// # Safety
/// `ranking` must be a live handle and `out_ranking` writable.
#[no_mangle]
pub unsafe extern "C" fn rb_observe_value_int(
    ranking: *const RbRanking,
    value: c_int,
    out_ranking: *mut *mut RbRanking,
) -> RbStatus {
    let Some(source) = borrow(ranking) else {
        return RbStatus::InvalidArgument;
    };
    if out_ranking.is_null() {
        return RbStatus::InvalidArgument;
    }
    match source.observe_value(value, Deduplication::Enabled) {
        Ok(observed) => into_handle(observed, out_ranking),
        Err(err) => status_of(&err),
    }
}

/// Report whether the ranking has no elements.
///
/// # Safety
/// `ranking` must be a live handle and `out_is_empty` writable.
#[no_mangle]
pub unsafe extern "C" fn rb_is_empty(
    ranking: *const RbRanking,
    out_is_empty: *mut c_int,
) -> RbStatus {
    let Some(source) = borrow(ranking) else {
        return RbStatus::InvalidArgument;
    };
    if out_is_empty.is_null() {
        return RbStatus::InvalidArgument;
    }
    *out_is_empty = c_int::from(source.is_empty());
    RbStatus::Ok
}

/// Read the first `(value, rank)` pair. `out_has_value` is 0 for an empty
/// ranking, in which case the other outputs are untouched.
///
/// # Safety
/// `ranking` must be a live handle; all out pointers writable.
#[no_mangle]
pub unsafe extern "C" fn rb_first_int(
    ranking: *const RbRanking,
    out_value: *mut c_int,
    out_rank: *mut u64,
    out_has_value: *mut c_int,
) -> RbStatus {
    let Some(source) = borrow(ranking) else {
        return RbStatus::InvalidArgument;
    };
    if out_value.is_null() || out_rank.is_null() || out_has_value.is_null() {
        return RbStatus::InvalidArgument;
    }
    match source.first() {
        Ok(None) => {
            *out_has_value = 0;
            RbStatus::Ok
        }
        Ok(Some((value, rank))) => {
            *out_value = value;
            *out_rank = rank_to_u64(rank);
            *out_has_value = 1;
            RbStatus::Ok
        }
        Err(err) => status_of(&err),
    }
}

/// Materialize up to `n` leading pairs into caller-provided buffers.
/// `buffer_size < n` is an error before anything is forced; `out_count`
/// receives the number of pairs written.
///
/// # Safety
/// `out_values` and `out_ranks` must point to `buffer_size` writable
/// elements; `ranking` must be a live handle; `out_count` writable.
#[no_mangle]
pub unsafe extern "C" fn rb_take_n_int(
    ranking: *const RbRanking,
    n: usize,
    out_values: *mut c_int,
    out_ranks: *mut u64,
    buffer_size: usize,
    out_count: *mut usize,
) -> RbStatus {
    let Some(source) = borrow(ranking) else {
        return RbStatus::InvalidArgument;
    };
    if out_values.is_null() || out_ranks.is_null() || out_count.is_null() {
        return RbStatus::InvalidArgument;
    }
    *out_count = 0;
    if buffer_size < n {
        return status_of(&Error::InsufficientBuffer {
            needed: n,
            capacity: buffer_size,
        });
    }
    match source.take_n(n) {
        Ok(pairs) => {
            let values = std::slice::from_raw_parts_mut(out_values, buffer_size);
            let ranks = std::slice::from_raw_parts_mut(out_ranks, buffer_size);
            for (slot, (value, rank)) in pairs.iter().enumerate() {
                values[slot] = *value;
                ranks[slot] = rank_to_u64(*rank);
            }
            *out_count = pairs.len();
            RbStatus::Ok
        }
        Err(err) => status_of(&err),
    }
}

/// Release a ranking handle. Null is a no-op.
///
/// # Safety
/// `ranking` must be null or a handle obtained from this interface that
/// has not been freed before.
#[no_mangle]
pub unsafe extern "C" fn rb_ranking_free(ranking: *mut RbRanking) {
    if !ranking.is_null() {
        drop(Box::from_raw(ranking));
    }
}
