//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only lists them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::ConversionTool;
use super::definitions::{
    ContentConvertTool, DocxToPdfTool, ExcelToCsvTool, GenericConvertTool, HtmlToPdfTool,
    ImageConvertTool, PdfToDocxTool,
};
use crate::domains::conversion::Converter;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(converter: Arc<Converter>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(DocxToPdfTool::create_route(converter.clone()))
        .with_route(PdfToDocxTool::create_route(converter.clone()))
        .with_route(ImageConvertTool::create_route(converter.clone()))
        .with_route(ExcelToCsvTool::create_route(converter.clone()))
        .with_route(HtmlToPdfTool::create_route(converter.clone()))
        .with_route(GenericConvertTool::create_route(converter.clone()))
        .with_route(ContentConvertTool::create_route(converter))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::Config;
    use crate::domains::conversion::Collaborators;

    struct TestServer {}

    fn test_converter() -> Arc<Converter> {
        Arc::new(Converter::from_config(&Config::default(), Collaborators::new()))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_converter());
        let tools = router.list_all();
        assert_eq!(tools.len(), 7);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"docx-to-pdf"));
        assert!(names.contains(&"pdf-to-docx"));
        assert!(names.contains(&"image-convert"));
        assert!(names.contains(&"excel-to-csv"));
        assert!(names.contains(&"html-or-markdown-to-pdf"));
        assert!(names.contains(&"generic-convert"));
        assert!(names.contains(&"content-convert"));
    }

    #[test]
    fn test_registry_matches_router() {
        let converter = test_converter();
        let registry = ToolRegistry::new(converter.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(converter);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
