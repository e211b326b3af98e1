//! Integration tests for client generation

use oapi_tsgen_common::{GenerateOptions, GeneratorError, MediaTypePolicy};
use oapi_tsgen_generator::{generate_client, ClientGenerator};
use oapi_tsgen_parser::OpenApiParser;
use tempfile::TempDir;

const HEADER: &str = "// This file is generated by oapi-tsgen and should not be edited by hand.\n";

const FOOS: &str = r#"
openapi: 3.0.0
info:
  title: Foos
  version: 1.0.0
paths:
  /foos:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [name]
              properties:
                name:
                  type: string
      responses:
        200:
          description: The stored foo
          content:
            application/json:
              schema:
                type: object
                required: [name]
                properties:
                  name:
                    type: string
        500:
          description: Server error
          content:
            application/json:
              schema:
                type: object
                required: [message]
                properties:
                  message:
                    type: string
"#;

const PETS: &str = r#"
openapi: 3.0.0
info:
  title: Pets
  version: 1.0.0
servers:
  - url: https://api.example.com
paths:
  /pets/{petId}:
    get:
      summary: Info for a pet
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: string
      responses:
        200:
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id:
          type: integer
        name:
          type: string
"#;

const SEARCH: &str = r#"
openapi: 3.0.0
info:
  title: Search
  version: 1.0.0
security:
  - basic: []
paths:
  /search:
    get:
      parameters:
        - name: q
          in: query
          required: true
          description: Search terms
          schema:
            type: string
        - name: page
          in: query
          schema:
            type: integer
        - name: X-Tenant
          in: header
          schema:
            type: string
      responses:
        200:
          description: Matches
          content:
            text/plain:
              schema:
                type: string
        404:
          description: Nothing found
components:
  securitySchemes:
    basic:
      type: http
      scheme: basic
"#;

fn render(document: &str, options: GenerateOptions) -> Result<String, GeneratorError> {
    let api = OpenApiParser::from_yaml(document)?.parse(&options)?;
    generate_client(api, options)
}

fn without_runtime() -> GenerateOptions {
    GenerateOptions {
        request: false,
        ..GenerateOptions::default()
    }
}

#[test]
fn test_create_foo_output() {
    let output = render(FOOS, without_runtime()).unwrap();

    let expected = r#"export interface CreateFooParams {
  data: {
    name: string;
  };
}

export type CreateFooResult =
  | CreateFooOKResult
  | CreateFooInternalServerErrorResult;

/** The stored foo */
export interface CreateFooOKResult {
  status: 200;
  headers: Headers;
  data: {
    name: string;
  };
}

/** Server error */
export interface CreateFooInternalServerErrorResult {
  status: 500;
  headers: Headers;
  data: {
    message: string;
  };
}

export async function createFoo(
  params: CreateFooParams,
  options: RequestOptions = {}
): Promise<CreateFooResult> {
  const response = await request({
    method: "POST",
    url: `/foos`,
    params,
    options,
    contentType: "application/json",
  });

  return response as CreateFooResult;
}
"#;

    assert_eq!(output, format!("{}\n{}", HEADER, expected));
}

#[test]
fn test_get_pet_output() {
    let output = render(PETS, without_runtime()).unwrap();

    let expected = r#"export interface Pet {
  id: number;
  name?: string;
}

export interface GetPetParams {
  petId: string;
}

export type GetPetResult =
  | GetPetOKResult;

export interface GetPetOKResult {
  status: 200;
  headers: Headers;
  data: Pet[];
}

/** Info for a pet */
export async function getPet(
  params: GetPetParams,
  options: RequestOptions = {}
): Promise<GetPetResult> {
  const response = await request({
    method: "GET",
    url: `https://api.example.com/pets/${params.petId}`,
    params,
    options,
  });

  return response as GetPetResult;
}
"#;

    assert_eq!(output, format!("{}\n{}", HEADER, expected));
}

#[test]
fn test_query_headers_and_basic_auth() {
    let output = render(SEARCH, without_runtime()).unwrap();

    assert!(output.contains(
        "export interface GetSearchParams {\n  query: {\n    /** Search terms */\n    q: string;\n    page?: number;\n  };\n  headers?: {\n    \"X-Tenant\"?: string;\n  };\n}"
    ));
    assert!(output.contains(
        "  const query = params.query ? `?${new URLSearchParams(params.query as any)}` : \"\";\n"
    ));
    assert!(output.contains("    url: `/search${query}`,\n"));
    assert!(output.contains("    basicAuth: true,\n"));
    assert!(!output.contains("contentType"));

    // text/plain payload, and a response without content
    assert!(output.contains("  status: 200;\n  headers: Headers;\n  data: string;\n"));
    assert!(output.contains(
        "/** Nothing found */\nexport interface GetSearchNotFoundResult {\n  status: 404;\n  headers: Headers;\n  data: any;\n}"
    ));
}

#[test]
fn test_section_order_with_runtime() {
    let output = render(PETS, GenerateOptions::default()).unwrap();

    let pet = output.find("export interface Pet {").unwrap();
    let runtime = output.find("export async function request(").unwrap();
    let params = output.find("export interface GetPetParams").unwrap();
    let binding = output.find("export async function getPet(").unwrap();

    assert!(output.starts_with(HEADER));
    assert!(pet < runtime && runtime < params && params < binding);
    assert!(output.ends_with("return response as GetPetResult;\n}\n"));
}

#[test]
fn test_sections_can_be_disabled() {
    let types_only = render(
        PETS,
        GenerateOptions {
            request: false,
            operations: false,
            ..GenerateOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        types_only,
        format!(
            "{}\nexport interface Pet {{\n  id: number;\n  name?: string;\n}}\n",
            HEADER
        )
    );

    let no_types = render(
        PETS,
        GenerateOptions {
            types: false,
            ..GenerateOptions::default()
        },
    )
    .unwrap();
    assert!(!no_types.contains("export interface Pet {"));
    assert!(no_types.contains("export interface RequestOptions {"));
    assert!(no_types.contains("export async function getPet("));
}

#[test]
fn test_without_doc_comments() {
    let output = render(
        SEARCH,
        GenerateOptions {
            with_doc: false,
            ..GenerateOptions::default()
        },
    )
    .unwrap();
    assert!(!output.contains("/**"));
}

#[test]
fn test_output_is_deterministic() {
    let first = render(SEARCH, GenerateOptions::default()).unwrap();
    let second = render(SEARCH, GenerateOptions::default()).unwrap();
    assert_eq!(first, second);

    let first = render(PETS, GenerateOptions::default()).unwrap();
    let second = render(PETS, GenerateOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_self_referential_type_output() {
    let document = r#"
openapi: 3.0.0
paths:
  /nodes:
    get:
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Node'
components:
  schemas:
    Node:
      description: A tree node
      type: object
      properties:
        children:
          type: array
          items:
            $ref: '#/components/schemas/Node'
"#;

    let output = render(document, without_runtime()).unwrap();
    assert!(output.contains(
        "/** A tree node */\nexport interface Node {\n  children?: Node[];\n}\n"
    ));
}

#[test]
fn test_prefer_policy_renders_json_payload() {
    let document = r#"
openapi: 3.0.0
paths:
  /report:
    get:
      responses:
        200:
          content:
            text/csv:
              schema:
                type: string
            application/json:
              schema:
                type: array
                items:
                  type: number
"#;

    let options = GenerateOptions {
        media_type_policy: MediaTypePolicy::Prefer,
        ..without_runtime()
    };
    let output = render(document, options).unwrap();
    assert!(output.contains("  data: number[];\n"));
}

#[test]
fn test_schema_named_like_operation_type_conflicts() {
    let document = r#"
openapi: 3.0.0
paths:
  /pets:
    get:
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/GetPetsOKResult'
components:
  schemas:
    GetPetsOKResult:
      type: string
"#;

    let err = render(document, GenerateOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::ConflictingTypeDefinition { ref name } if name == "GetPetsOKResult"
    ));
}

#[test]
fn test_generate_to_file() {
    let api = OpenApiParser::from_yaml(PETS)
        .unwrap()
        .parse(&GenerateOptions::default())
        .unwrap();
    let generator = ClientGenerator::new(api, GenerateOptions::default()).unwrap();

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("src").join("client.ts");
    generator.generate_to_file(&output_path).unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, generator.render().unwrap());
}

#[test]
fn test_teapot_next_to_default_response() {
    let document = r#"
openapi: 3.0.0
paths:
  /brew:
    post:
      responses:
        418:
          description: Refuses to brew coffee
        default:
          description: Unexpected error
"#;

    let output = render(document, without_runtime()).unwrap();
    assert!(output.contains(
        "export type CreateBrewResult =\n  | CreateBrewImATeapotResult\n  | CreateBrewDefaultResult;"
    ));
    assert!(output.contains("export interface CreateBrewImATeapotResult {\n  status: 418;\n"));
    assert!(output.contains("export interface CreateBrewDefaultResult {\n  status: 500;\n"));
}
