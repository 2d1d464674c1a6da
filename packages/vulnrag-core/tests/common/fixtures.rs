//! Graph documents and source snippets

use serde_json::{json, Value};

/// Three vertices (two calls, one identifier) joined by two AST edges
pub fn fixture_scenario_a() -> Value {
    json!({
        "@type": "tinker:graph",
        "@value": {
            "vertices": [
                {"id": 1, "label": "CALL", "properties": {"NAME": {"@value": ["strcpy"]}}},
                {"id": 2, "label": "CALL", "properties": {"NAME": {"@value": ["foo"]}}},
                {"id": 3, "label": "IDENTIFIER", "properties": {"NAME": {"@value": ["buf"]}}}
            ],
            "edges": [
                {"outV": 1, "inV": 2, "label": "AST"},
                {"outV": 1, "inV": 3, "label": "AST"}
            ]
        }
    })
}

/// A small method with a call, a loop and reaching-definition edges
pub fn fixture_method_graph() -> Value {
    json!({
        "@type": "tinker:graph",
        "@value": {
            "vertices": [
                {"id": {"@type": "g:Int64", "@value": 10}, "label": "METHOD",
                 "properties": {"NAME": {"@value": ["copy_input"]}, "FULL_NAME": {"@value": ["copy_input"]}}},
                {"id": {"@type": "g:Int64", "@value": 11}, "label": "CONTROL_STRUCTURE",
                 "properties": {"CONTROL_STRUCTURE_TYPE": {"@value": ["WHILE"]}}},
                {"id": {"@type": "g:Int64", "@value": 12}, "label": "CALL",
                 "properties": {"NAME": {"@value": ["memcpy"]}}},
                {"id": {"@type": "g:Int64", "@value": 13}, "label": "CALL",
                 "properties": {"NAME": {"@value": ["free"]}}},
                {"id": {"@type": "g:Int64", "@value": 14}, "label": "IDENTIFIER",
                 "properties": {"NAME": {"@value": ["buffer"]}}}
            ],
            "edges": [
                {"outV": 10, "inV": 11, "label": "AST"},
                {"outV": 11, "inV": 12, "label": "AST"},
                {"outV": 11, "inV": 13, "label": "CFG"},
                {"outV": 12, "inV": 14, "label": "REACHING_DEF"},
                {"outV": 14, "inV": 13, "label": "REACHING_DEF"}
            ]
        }
    })
}

/// Mostly UNKNOWN vertices
pub fn fixture_flat_graph() -> Value {
    let vertices: Vec<Value> = (1..=10)
        .map(|id| {
            let label = if id == 1 { "METHOD" } else { "UNKNOWN" };
            json!({"id": id, "label": label})
        })
        .collect();
    json!({"@type": "tinker:graph", "@value": {"vertices": vertices, "edges": []}})
}

pub const NESTED_STRCPY: &str = "void f(){ if(x){ strcpy(a,b); } }";

pub const OVERFLOW_BEFORE: &str = r#"
int read_name(char *src) {
    char name[16];
    strcpy(name, src);
    return process(name);
}
"#;

pub const OVERFLOW_AFTER: &str = r#"
int read_name(char *src) {
    char name[16];
    if (strlen(src) >= sizeof(name)) {
        return -1;
    }
    strncpy(name, src, sizeof(name) - 1);
    return process(name);
}
"#;

pub const UAF_BEFORE: &str = r#"
void release(struct session *s) {
    kfree(s->buf);
    s->buf->len = 0;
}
"#;

pub const UAF_AFTER: &str = r#"
void release(struct session *s) {
    kfree(s->buf);
    s->buf = NULL;
}
"#;
