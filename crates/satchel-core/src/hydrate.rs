//! Per-request props hydration.

use crate::{BindingPlan, Handler, Props};
use satchel_extract::{extract, ExtractionContext, ExtractionError};

/// Builds a fresh props instance for one request.
///
/// Clones the plan's template and fills every field in declared order. The
/// first field that fails stops hydration and its error is returned. The
/// template itself is never modified.
pub fn hydrate<H, Args>(
    plan: &BindingPlan<H, Args>,
    ctx: &ExtractionContext,
) -> Result<H::Props, ExtractionError>
where
    H: Handler<Args>,
{
    let mut props = plan.template().clone();
    for (index, field) in plan.fields().iter().enumerate() {
        let value = extract(ctx, field)?;
        props.assign(index, value)?;
    }
    Ok(props)
}
