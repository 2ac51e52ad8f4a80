//! Structural checks on every advertised input schema.

use data_adapters::mcp::catalog::required_fields;
use data_adapters::{finance, gmail, news, stocks, weather};
use rmcp::model::Tool;
use serde_json::Value;

fn all_tools() -> Vec<Tool> {
    let mut tools = finance::tools::catalog();
    tools.extend(gmail::tools::catalog());
    tools.extend(news::tools::catalog());
    tools.extend(weather::tools::catalog());
    tools.extend(stocks::tools::catalog());
    tools
}

#[test]
fn every_schema_is_an_object() {
    for tool in all_tools() {
        assert_eq!(
            tool.input_schema.get("type").and_then(Value::as_str),
            Some("object"),
            "{}",
            tool.name
        );
        assert!(
            tool.input_schema.get("properties").is_some_and(Value::is_object),
            "{} has no properties map",
            tool.name
        );
    }
}

#[test]
fn required_fields_are_declared_properties() {
    for tool in all_tools() {
        let properties = tool.input_schema.get("properties").and_then(Value::as_object);
        for field in required_fields(&tool) {
            assert!(
                properties.is_some_and(|props| props.contains_key(field)),
                "{} requires undeclared field {field}",
                tool.name
            );
        }
    }
}

#[test]
fn every_tool_is_described() {
    for tool in all_tools() {
        assert!(
            tool.description.as_deref().is_some_and(|text| !text.is_empty()),
            "{} has no description",
            tool.name
        );
    }
}

#[test]
fn enums_list_their_default() {
    for tool in all_tools() {
        let Some(properties) = tool.input_schema.get("properties").and_then(Value::as_object) else {
            continue;
        };
        for (name, property) in properties {
            let (Some(options), Some(default)) = (
                property.get("enum").and_then(Value::as_array),
                property.get("default"),
            ) else {
                continue;
            };
            assert!(
                options.contains(default),
                "{}.{name} default {default} is not an option",
                tool.name
            );
        }
    }
}

#[test]
fn required_lists_match_the_menus() {
    let required = |tools: Vec<Tool>, name: &str| -> Vec<String> {
        let tool = tools
            .into_iter()
            .find(|tool| tool.name == name)
            .expect("tool exists");
        required_fields(&tool).into_iter().map(str::to_owned).collect()
    };

    assert_eq!(required(finance::tools::catalog(), "search_transactions"), ["search_term"]);
    assert_eq!(required(finance::tools::catalog(), "execute_select_query"), ["query"]);
    assert!(required(finance::tools::catalog(), "get_spending_summary").is_empty());
    assert_eq!(required(gmail::tools::catalog(), "get_email_details"), ["email_id"]);
    assert_eq!(required(news::tools::catalog(), "get_category_news"), ["category"]);
    assert!(required(news::tools::catalog(), "get_top_headlines").is_empty());
    assert_eq!(required(weather::tools::catalog(), "get_air_quality"), ["lat", "lon"]);
    assert_eq!(required(weather::tools::catalog(), "get_multi_location_weather"), ["locations"]);
    assert_eq!(required(stocks::tools::catalog(), "get_portfolio_summary"), ["symbols"]);
}
