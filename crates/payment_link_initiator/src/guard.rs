//! Decides whether the page may activate at all.
//!
//! A secure payment link is only ever served into an iframe on one of the merchant's allowed
//! domains. Loaded as a top-level document, it must refuse to bring up the checkout widget.

use crate::{
    host::{FrameInspector, PageDocument},
    locale::Translations,
    logger,
};

/// Relationship between the page and the context embedding it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FramingState {
    /// The page is its own top-level document.
    SameContext,
    /// The page is embedded by another document.
    DifferentContext,
    /// The embedding context could not be inspected. Access is only denied across origins.
    Unknown,
}

impl FramingState {
    pub fn detect(inspector: &dyn FrameInspector) -> Self {
        match inspector.parent_location_matches() {
            Ok(true) => Self::SameContext,
            Ok(false) => Self::DifferentContext,
            Err(error) => {
                logger::debug!(?error, "parent location is not accessible");
                Self::Unknown
            }
        }
    }

    pub fn is_framed(self) -> bool {
        match self {
            Self::DifferentContext | Self::Unknown => true,
            Self::SameContext => false,
        }
    }
}

/// Where the not-allowed message ended up.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NotAllowedTarget {
    Container,
    Body,
    /// Neither the container nor a body exists; nothing could be rendered.
    Nowhere,
}

/// Replaces the page content with the not-allowed message. Uses the container element when it
/// exists and is a `div`, the whole body otherwise.
pub fn render_not_allowed(
    document: &dyn PageDocument,
    container_id: &str,
    translations: &Translations,
) -> NotAllowedTarget {
    if let Some(container) = document
        .element_by_id(container_id)
        .filter(|element| element.is_container())
    {
        container.set_inner_html(&translations.not_allowed);
        return NotAllowedTarget::Container;
    }

    match document.body() {
        Some(body) => {
            body.set_inner_html(&translations.not_allowed);
            NotAllowedTarget::Body
        }
        None => {
            logger::error!("page has neither a payment link container nor a body");
            NotAllowedTarget::Nowhere
        }
    }
}

#[cfg(test)]
mod tests {
    use error_stack::report;

    use super::*;
    use crate::errors::{CustomResult, FrameAccessError};

    struct Parent(Option<bool>);

    impl FrameInspector for Parent {
        fn parent_location_matches(&self) -> CustomResult<bool, FrameAccessError> {
            self.0.ok_or_else(|| report!(FrameAccessError))
        }
    }

    #[test]
    fn test_same_location_is_not_framed() {
        let state = FramingState::detect(&Parent(Some(true)));
        assert_eq!(state, FramingState::SameContext);
        assert!(!state.is_framed());
    }

    #[test]
    fn test_different_location_is_framed() {
        let state = FramingState::detect(&Parent(Some(false)));
        assert_eq!(state, FramingState::DifferentContext);
        assert!(state.is_framed());
    }

    #[test]
    fn test_denied_access_is_treated_as_framed() {
        let state = FramingState::detect(&Parent(None));
        assert_eq!(state, FramingState::Unknown);
        assert!(state.is_framed());
    }
}
