use crate::{schema::SchemaDescriptor, utils::to_pascal};

/// Everything one call to the generation service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub schema: SchemaDescriptor,
    pub user_prompt: String,
}

pub fn procedure_name(schema: &SchemaDescriptor) -> String {
    format!("sp_get_{}", schema.table_name)
}

pub fn api_name(schema: &SchemaDescriptor) -> String {
    format!("get{}", to_pascal(&schema.table_name))
}

/// Builds the generation request. Pure: the same inputs give the same text.
pub fn compose(contract: &str, schema: &SchemaDescriptor, user_prompt: &str) -> GenerationRequest {
    let table = &schema.table_name;
    let procedure = procedure_name(schema);
    let api = api_name(schema);
    let data_key = &schema.data_key;
    let order_by = schema.primary_key.as_deref().unwrap_or("<primary_key>");
    let schema_json =
        serde_json::to_string_pretty(schema).expect("schema descriptor serializes to JSON");

    let system_prompt = format!(
        r#"You are a code generator that creates MySQL stored procedures and JavaScript API functions.

{contract}

Table Schema (JSON):
{schema_json}

Generate code based on the user's prompt. Return ONLY valid JSON in this exact format:
{{
  "procedure": {{
    "name": "{procedure}",
    "sql": "<complete SQL stored procedure code>"
  }},
  "api": {{
    "name": "{api}",
    "js": "<complete JavaScript function code>"
  }}
}}

CRITICAL SQL REQUIREMENTS:
- Parameter names MUST use "p_" prefix: p_page, p_limit (NOT "page" or "limit" - these are reserved keywords)
- Use OUT parameter for total count: OUT p_total INT
- Procedure signature: CREATE PROCEDURE {procedure}(IN p_page INT, IN p_limit INT, OUT p_total INT)
- MUST declare variable for offset: DECLARE v_offset INT DEFAULT 0;
- MUST calculate offset in variable: SET v_offset = (p_page - 1) * p_limit;
- NEVER use calculations directly in LIMIT clause - always use variable: LIMIT p_limit OFFSET v_offset
- Include parameter validation: IF p_page < 1 THEN SET p_page = 1; END IF; (same for p_limit)
- Get total count: SELECT COUNT(*) INTO p_total FROM {table}
- Return paginated data: SELECT ... FROM {table} ORDER BY {order_by} LIMIT p_limit OFFSET v_offset
- Use DELIMITER $$ and DELIMITER ; for procedure definition
- Include proper error handling with DECLARE EXIT HANDLER FOR SQLEXCEPTION

JavaScript Requirements (MUST follow this exact pattern):
- Import: const mysql = require('mysql2/promise'); require('dotenv').config();
- Function signature: async function {api}(page = 1, limit = 10)
- Connection: let connection; then createConnection with process.env variables
- Use connection.execute() (NOT query) for both CALL and SELECT
- Call procedure: const [results] = await connection.execute('CALL {procedure}(?, ?, @total)', [page, limit]);
- Get total: const [totalResult] = await connection.execute('SELECT @total as total');
- Extract data: const data = results[0]; (first result set from stored procedure)
- Return format: {{ success: true, data: {{ {data_key}: data, pagination: {{ page, limit, total, totalPages }} }}, error: null }}
- Error handling: try/catch returning {{ success: false, data: null, error: error.message }}
- Finally block: if (connection) await connection.end();
- Export: module.exports = {{ {api} }};

Important:
- Use the actual table schema provided above
- Include all columns from the schema in the SELECT statement
- Generate complete, working code (no placeholders)
- Follow all rules from the contract above
- NEVER use "limit" or "page" as parameter names - always use p_limit and p_page"#
    );

    GenerationRequest {
        system_prompt,
        schema: schema.clone(),
        user_prompt: user_prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnInfo;

    fn orders() -> SchemaDescriptor {
        let columns = ["id", "customer_id", "total"]
            .into_iter()
            .map(|name| ColumnInfo {
                name: name.to_string(),
                sql_type: "int".to_string(),
                nullable: false,
                key_role: if name == "id" { "PRI" } else { "" }.to_string(),
                default_value: None,
                extra: String::new(),
            })
            .collect();
        SchemaDescriptor::new("orders", columns, Some("id".into()))
    }

    const CONTRACT: &str = "## House rules\nAlways {brace} yourself.";

    #[test]
    fn contract_and_prompt_are_embedded_verbatim() {
        let request = compose(CONTRACT, &orders(), "get all orders");
        assert!(request.system_prompt.contains(CONTRACT));
        assert_eq!(request.user_prompt, "get all orders");
        assert_eq!(request.schema, orders());
    }

    #[test]
    fn schema_is_embedded_as_json() {
        let schema = orders();
        let request = compose(CONTRACT, &schema, "get all orders");
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(request.system_prompt.contains(&json));
        for column in ["\"id\"", "\"customer_id\"", "\"total\""] {
            assert!(request.system_prompt.contains(column), "{column}");
        }
    }

    #[test]
    fn output_shape_and_names_are_requested() {
        let request = compose(CONTRACT, &orders(), "get all orders");
        let prompt = &request.system_prompt;
        for needle in [
            "\"procedure\"",
            "\"api\"",
            "\"name\": \"sp_get_orders\"",
            "\"name\": \"getOrders\"",
            "\"sql\"",
            "\"js\"",
        ] {
            assert!(prompt.contains(needle), "{needle}");
        }
    }

    #[test]
    fn generated_code_constraints_are_spelled_out() {
        let request = compose(CONTRACT, &orders(), "get all orders");
        let prompt = &request.system_prompt;
        for needle in [
            "IN p_page INT, IN p_limit INT, OUT p_total INT",
            "DECLARE v_offset INT DEFAULT 0;",
            "SET v_offset = (p_page - 1) * p_limit;",
            "LIMIT p_limit OFFSET v_offset",
            "IF p_page < 1 THEN SET p_page = 1; END IF;",
            "SELECT COUNT(*) INTO p_total FROM orders",
            "ORDER BY id",
            "CALL sp_get_orders(?, ?, @total)",
            "data: { orders: data, pagination: { page, limit, total, totalPages } }",
            "{ success: false, data: null, error: error.message }",
            "if (connection) await connection.end();",
        ] {
            assert!(prompt.contains(needle), "{needle}");
        }
    }

    #[test]
    fn compose_is_deterministic() {
        let schema = orders();
        assert_eq!(
            compose(CONTRACT, &schema, "show orders"),
            compose(CONTRACT, &schema, "show orders")
        );
    }

    #[test]
    fn names_follow_table() {
        let schema = SchemaDescriptor::new("order_items", vec![], None);
        assert_eq!(procedure_name(&schema), "sp_get_order_items");
        assert_eq!(api_name(&schema), "getOrderItems");
        let request = compose("", &schema, "");
        assert!(request.system_prompt.contains("data: { orderitems: data"));
        assert!(request.system_prompt.contains("ORDER BY <primary_key>"));
    }
}
