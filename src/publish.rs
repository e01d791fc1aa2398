//! Whole-buffer publication of a finished shadow.

use tracing::debug;

use crate::arena::ScopedShadow;
use crate::buffer::PixelBuffer;
use crate::foundation::core::Pixel;
use crate::foundation::error::{FilterError, FilterResult};

/// Move the shadow's storage into `target` and hand the old storage back to the arena.
///
/// Must only be called after every row range has completed. This is a pointer swap, not a copy:
/// `target` shows either all of its previous contents or all of the shadow's.
pub(crate) fn publish<P: Pixel>(
    target: &mut PixelBuffer<P>,
    mut shadow: ScopedShadow<'_, P>,
) -> FilterResult<()> {
    if shadow.size() != (target.width(), target.height())
        || shadow.pixels().len() != target.pixels().len()
    {
        return Err(FilterError::worker(format!(
            "shadow {:?} does not match target {}x{}",
            shadow.size(),
            target.width(),
            target.height()
        )));
    }

    shadow.swap_storage(target.storage_mut());
    debug!(
        width = target.width(),
        height = target.height(),
        "published filtered buffer"
    );
    // Dropping the guard returns the previous storage to the arena.
    drop(shadow);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/publish.rs"]
mod tests;
