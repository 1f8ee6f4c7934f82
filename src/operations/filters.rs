use crate::{
    filters::{FilterKind, parse_filter},
    foundation::error::RetouchResult,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    render::backend::Renderer,
};

/// Applies one named recipe from the filter registry.
#[derive(Clone, Debug, PartialEq)]
pub struct FiltersOperation {
    filter: FilterKind,
}

impl Default for FiltersOperation {
    fn default() -> Self {
        Self {
            filter: FilterKind::Identity,
        }
    }
}

impl FiltersOperation {
    pub const IDENTIFIER: &'static str = "filters";

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    /// Fails with `UnknownIdentifier` and keeps the current filter when `identifier` is not
    /// registered.
    pub fn set_filter(&mut self, identifier: &str) -> RetouchResult<()> {
        self.filter = parse_filter(identifier)?;
        Ok(())
    }
}

impl Operation for FiltersOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Color
    }

    fn is_identity(&self) -> bool {
        self.filter == FilterKind::Identity
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([("filter".to_string(), self.filter.identifier().into())])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["filter"])?;
        if let Some(id) = reader.text("filter")? {
            self.set_filter(id)?;
        }
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        for primitive in self.filter.primitives()? {
            renderer.run_primitive(primitive.as_ref())?;
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/filters.rs"]
mod tests;
