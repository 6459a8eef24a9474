use flowstudio::{
    Connection, Edit, FlowError, FlowGraph, FlowModel, NodeConfig, NodeKind, NodePatch, Position, render,
    graph::{ConditionConfig, TestConfig},
};

fn stage_order(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|l| l.strip_prefix("    identifier: "))
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_api_test_node_renders_assertion_and_name() {
    let (graph, nid) = FlowGraph::new().add_node(NodeKind::Test, None).unwrap();
    let graph = graph
        .update_node(
            &nid,
            NodePatch {
                label: Some("API Test".into()),
                config: Some(NodeConfig::Test(TestConfig {
                    endpoint: Some("https://x/y".into()),
                    expected_status: Some(201),
                    ..Default::default()
                })),
                ..Default::default()
            },
        )
        .unwrap();

    let text = render(graph.nodes(), graph.connections()).unwrap();
    assert!(text.lines().any(|l| l.contains("response.status == 201")));
    assert!(text.lines().any(|l| l.trim() == "- name: api-test"));
    assert!(text.contains(&format!("    identifier: {}\n", nid)));
    assert!(text.contains("    type: Integration\n"));
    assert!(text.contains("url: https://x/y\n"));
    assert!(text.contains(&format!("  - name: {}_endpoint\n    type: String\n    value: https://x/y\n", nid)));
}

#[test]
fn test_condition_node_renders_when_clause() {
    let (graph, nid) = FlowGraph::new().add_node(NodeKind::Condition, None).unwrap();
    let graph = graph
        .update_node(
            &nid,
            NodePatch::config(NodeConfig::Condition(ConditionConfig {
                condition: Some("x==1".into()),
                description: Some("d".into()),
                ..Default::default()
            })),
        )
        .unwrap();

    let text = graph.render().unwrap();
    assert!(text.contains("    type: Conditional\n    when:\n      pipelineStatus: Success\n      condition: x==1\n"));
    assert!(text.contains("echo \"Checking: x==1\""));
    assert!(text.contains("# On failure: fail"));
    assert!(text.contains(&format!("{}_condition", nid)));
    assert!(text.contains(&format!("name: {}_description\n", nid)));
}

#[test]
fn test_bad_headers_fail_whole_export() {
    let (graph, nid) = FlowGraph::new().add_node(NodeKind::Test, None).unwrap();
    let graph = graph
        .update_node(
            &nid,
            NodePatch::config(NodeConfig::Test(TestConfig {
                headers: Some("{not json".into()),
                ..Default::default()
            })),
        )
        .unwrap();

    match graph.render() {
        Err(FlowError::Export { node_id, field, .. }) => {
            assert_eq!(node_id, nid);
            assert_eq!(field, "headers");
        }
        other => panic!("expected export error, got {:?}", other),
    }
    let message = graph.render().unwrap_err().to_string();
    assert!(message.contains(&nid));
}

#[test]
fn test_export_order_follows_x_not_connections() {
    let (graph, a) = FlowGraph::new().add_node(NodeKind::Test, None).unwrap();
    let (graph, b) = graph.add_node(NodeKind::Condition, None).unwrap();
    let (graph, c) = graph.add_node(NodeKind::Test, None).unwrap();
    assert_eq!(stage_order(&graph.render().unwrap()), vec![a.clone(), b.clone(), c.clone()]);

    // rewiring alone changes nothing
    let rewired = graph
        .apply(&Edit::Connect {
            from: c.clone(),
            to: a.clone(),
        })
        .apply(&Edit::Connect {
            from: "start".into(),
            to: c.clone(),
        });
    let mut reversed: Vec<Connection> = rewired.connections().to_vec();
    reversed.reverse();
    assert_eq!(stage_order(&render(rewired.nodes(), &reversed).unwrap()), vec![a.clone(), b.clone(), c.clone()]);

    // moving does
    let moved = rewired.move_node(&c, Position::new(0.0, 0.0)).unwrap();
    assert_eq!(stage_order(&moved.render().unwrap()), vec![c.clone(), a.clone(), b.clone()]);

    // ties keep insertion order
    let tied = moved.move_node(&b, Position::new(0.0, 50.0)).unwrap();
    assert_eq!(stage_order(&tied.render().unwrap()), vec![b, c, a]);
}

#[test]
fn test_variables_skip_type_and_timeout() {
    let (graph, nid) = FlowGraph::new().add_node(NodeKind::Test, None).unwrap();
    let graph = graph
        .update_node(
            &nid,
            NodePatch::config(NodeConfig::Test(TestConfig {
                test_type: Some("Http".into()),
                timeout: Some(60),
                ..Default::default()
            })),
        )
        .unwrap();
    let document = graph.to_document().unwrap();
    assert_eq!(document.spec.variables.len(), 2);
    let text = graph.render().unwrap();
    assert!(!text.contains(&format!("{}_testType", nid)));
    assert!(!text.contains(&format!("{}_timeout", nid)));
}

#[test]
fn test_export_from_exchange_model() {
    let json = r#"{
        "nodes": [
            {"id": "start", "type": "start", "label": "Start", "x": 100, "y": 200},
            {"id": "check", "type": "condition", "label": "Gate", "x": 500, "y": 200,
             "config": {"condition": "x==1", "description": "d"}},
            {"id": "api", "type": "test", "label": "API Test", "x": 300, "y": 200,
             "config": {"endpoint": "https://x/y", "expectedStatus": "201", "timeout": 30}},
            {"id": "end", "type": "end", "label": "End", "x": 700, "y": 200}
        ],
        "connections": [
            {"id": "start-api", "from": "start", "to": "api"},
            {"id": "api-check", "from": "api", "to": "check"},
            {"id": "check-end", "from": "check", "to": "end"}
        ]
    }"#;
    let graph = FlowGraph::try_from(&FlowModel::from_json(json).unwrap()).unwrap();
    let text = graph.render().unwrap();
    assert_eq!(stage_order(&text), vec!["api".to_string(), "check".to_string()]);

    let document = graph.to_document().unwrap();
    let names: Vec<&str> = document.spec.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["test_environment", "timeout_duration", "check_condition", "check_description", "api_endpoint"]);
}

#[test]
fn test_rendered_text_parses_back() {
    let (graph, nid) = FlowGraph::new().add_node(NodeKind::Test, None).unwrap();
    let graph = graph
        .update_node(
            &nid,
            NodePatch {
                label: Some("Login: Admin".into()),
                config: Some(NodeConfig::Test(TestConfig {
                    endpoint: Some("https://x/login #main".into()),
                    body: Some("- not a list".into()),
                    ..Default::default()
                })),
                ..Default::default()
            },
        )
        .unwrap();
    let (graph, cid) = graph.add_node(NodeKind::Condition, None).unwrap();

    let text = graph.render().unwrap();
    let parsed: serde_json::Value = serde_yaml::from_str(&text).unwrap();
    let stages = &parsed["spec"]["stages"];
    let step = &stages[0]["spec"]["execution"]["steps"][0]["step"];
    assert_eq!(stages[0]["name"], "login:-admin");
    assert_eq!(step["name"], "Login: Admin");
    assert_eq!(step["spec"]["url"], "https://x/login #main");
    assert_eq!(step["spec"]["requestBody"], "- not a list");

    let script = stages[1]["spec"]["execution"]["steps"][0]["step"]["spec"]["source"]["spec"]["script"].as_str().unwrap();
    assert_eq!(script.lines().count(), 4);
    assert_eq!(stages[1]["identifier"], cid.as_str());
}
