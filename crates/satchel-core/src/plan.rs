//! Binding plans.
//!
//! A [`BindingPlan`] is the result of analysing a handler once, at
//! registration. It owns the handler, the validated field schema, the
//! template props instance and the resolved [`ReturnStrategy`].

use crate::{BindingError, Handler, HandlerOutput, Props, ReturnStrategy};
use satchel_extract::{FieldDescriptor, SourceDescriptor};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Registration-time analysis of one handler.
///
/// Immutable after [`BindingPlan::build`]; shared by all requests.
pub struct BindingPlan<H, Args>
where
    H: Handler<Args>,
{
    handler: H,
    fields: Vec<FieldDescriptor>,
    template: H::Props,
    strategy: ReturnStrategy,
    props_type: &'static str,
    _args: PhantomData<fn() -> Args>,
}

impl<H, Args> BindingPlan<H, Args>
where
    H: Handler<Args>,
{
    /// Analyses `handler`.
    ///
    /// Every field must have a supported kind and a non-empty source, and the
    /// return shape must resolve to a strategy.
    pub fn build(handler: H) -> Result<Self, BindingError> {
        let props_type = <H::Props as Props>::type_name();
        let fields = <H::Props as Props>::fields();

        for field in &fields {
            validate_field(props_type, field)?;
            debug!(
                props = props_type,
                field = field.name(),
                kind = %field.kind(),
                source = %display_source(field.source()),
                "bound props field"
            );
        }

        let strategy = ReturnStrategy::resolve(<H::Output as HandlerOutput>::shape())?;
        debug!(
            props = props_type,
            fields = fields.len(),
            takes_context = H::takes_context(),
            strategy = %strategy,
            "built binding plan"
        );

        Ok(Self {
            handler,
            fields,
            template: H::Props::default(),
            strategy,
            props_type,
            _args: PhantomData,
        })
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the validated field schema, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the template props instance.
    #[must_use]
    pub fn template(&self) -> &H::Props {
        &self.template
    }

    /// Returns the response strategy.
    #[must_use]
    pub fn strategy(&self) -> ReturnStrategy {
        self.strategy
    }

    /// Returns the props type name.
    #[must_use]
    pub fn props_type(&self) -> &'static str {
        self.props_type
    }
}

fn validate_field(props: &'static str, field: &FieldDescriptor) -> Result<(), BindingError> {
    let kind = field.kind();
    if !kind.is_supported() {
        return Err(BindingError::UnsupportedFieldType {
            props,
            field: field.name(),
            type_name: kind.to_string(),
        });
    }

    match field.source() {
        Some(source) if !source.key().is_empty() => Ok(()),
        _ => Err(BindingError::MissingSource {
            props,
            field: field.name(),
        }),
    }
}

fn display_source(source: Option<&SourceDescriptor>) -> String {
    source.map_or_else(|| "none".to_string(), ToString::to_string)
}

impl<H, Args> fmt::Display for BindingPlan<H, Args>
where
    H: Handler<Args>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.props_type, self.strategy)
    }
}

impl<H, Args> fmt::Debug for BindingPlan<H, Args>
where
    H: Handler<Args>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingPlan")
            .field("props_type", &self.props_type)
            .field("fields", &self.fields)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
