use responses_api::{
    InputMessage, ResponsesInput, ResponsesRequest, ResponsesTool, WebSearchFilters,
};
use serde_json::json;

#[test]
fn conversation_payload_uses_typed_content_parts() {
    let request = ResponsesRequest::new(
        "gpt-5.1",
        ResponsesInput::Messages(vec![
            InputMessage::user("Grüezi"),
            InputMessage::assistant("Hallo!"),
        ]),
        Some("be brief".to_owned()),
    )
    .with_reasoning_effort("low");

    let value = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(
        value,
        json!({
            "model": "gpt-5.1",
            "instructions": "be brief",
            "input": [
                {"role": "user", "content": [{"type": "input_text", "text": "Grüezi"}]},
                {"role": "assistant", "content": [{"type": "output_text", "text": "Hallo!"}]}
            ],
            "reasoning": {"effort": "low"},
            "store": false
        })
    );
}

#[test]
fn text_payload_serializes_input_as_string() {
    let request = ResponsesRequest::new("gpt-5.1", ResponsesInput::Text("hi".to_owned()), None);

    let value = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(value["input"], "hi");
    assert!(value.get("instructions").is_none());
    assert!(value.get("tools").is_none());
}

#[test]
fn web_search_tool_carries_domain_filter() {
    let request = ResponsesRequest::new("gpt-5.1", ResponsesInput::Text("news".to_owned()), None)
        .with_tool(ResponsesTool::WebSearch {
            filters: Some(WebSearchFilters {
                allowed_domains: vec!["cisa.gov".to_owned()],
            }),
        })
        .with_tool(ResponsesTool::WebSearch { filters: None });

    let value = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(
        value["tools"],
        json!([
            {"type": "web_search", "filters": {"allowed_domains": ["cisa.gov"]}},
            {"type": "web_search"}
        ])
    );
}
