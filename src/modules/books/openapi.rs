use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn pagination_parameters() -> Value {
    json!([
        {
            "name": "skip",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "minimum": 0, "default": 0 },
            "description": "Number of records to skip"
        },
        {
            "name": "limit",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "minimum": 1, "maximum": 1000, "default": 100 },
            "description": "Maximum number of records to return"
        }
    ])
}

fn book_id_parameter() -> Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

/// OpenAPI fragment for the books module, paths relative to the module root
pub fn document() -> Value {
    let mut review_parameters = pagination_parameters();
    if let Some(parameters) = review_parameters.as_array_mut() {
        parameters.insert(0, book_id_parameter());
    }

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "description": "Served from cache when the exact window is cached.",
                    "tags": ["Books"],
                    "parameters": pagination_parameters(),
                    "responses": {
                        "200": json_response("List of books", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        })),
                        "422": error_response("Invalid pagination parameters"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": json_response("Created book", json!({ "$ref": "#/components/schemas/Book" })),
                        "400": error_response("Duplicate ISBN or other uniqueness violation"),
                        "422": error_response("Validation error"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "200": json_response("Book", json!({ "$ref": "#/components/schemas/Book" })),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{book_id}/reviews": {
                "get": {
                    "summary": "List reviews of a book",
                    "tags": ["Reviews"],
                    "parameters": review_parameters,
                    "responses": {
                        "200": json_response("List of reviews", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Review" }
                        })),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Review a book",
                    "tags": ["Reviews"],
                    "parameters": [book_id_parameter()],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateReview" }
                            }
                        }
                    },
                    "responses": {
                        "201": json_response("Created review", json!({ "$ref": "#/components/schemas/Review" })),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error"),
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "isbn": { "type": "string", "nullable": true },
                        "description": { "type": "string", "nullable": true },
                        "published_year": { "type": "integer", "nullable": true },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time", "nullable": true }
                    },
                    "required": ["id", "title", "author", "created_at"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1, "maxLength": 255 },
                        "author": { "type": "string", "minLength": 1, "maxLength": 255 },
                        "isbn": { "type": "string", "minLength": 10, "maxLength": 13 },
                        "description": { "type": "string" },
                        "published_year": { "type": "integer", "minimum": 1000, "maximum": 2024 }
                    },
                    "required": ["title", "author"]
                },
                "Review": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "book_id": { "type": "integer", "format": "int64" },
                        "reviewer_name": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": "string", "nullable": true },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time", "nullable": true }
                    },
                    "required": ["id", "book_id", "reviewer_name", "rating", "created_at"]
                },
                "CreateReview": {
                    "type": "object",
                    "properties": {
                        "reviewer_name": { "type": "string", "minLength": 1, "maxLength": 255 },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": "string" }
                    },
                    "required": ["reviewer_name", "rating"]
                }
            }
        }
    })
}
