//! Generate golden fixtures for Sigil conformance testing

use sigil_abi::{schema_id, schema_text};
use sigil_schema::{validate, Schema};
use std::fs;
use std::path::Path;

fn main() {
    let fixtures_dir = Path::new("fixtures/v1");
    let schemas_dir = fixtures_dir.join("schemas");
    let golden_dir = fixtures_dir.join("golden");

    println!("Generating golden fixtures...");
    println!();

    let mut count = 0;

    for entry in fs::read_dir(&schemas_dir).expect("Failed to read schemas directory") {
        let path = entry.expect("Failed to read entry").path();

        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let filename = path.file_stem().unwrap().to_str().unwrap();
            let json = fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Failed to read {}.json", filename));

            let schema: Schema = serde_json::from_str(&json)
                .unwrap_or_else(|_| panic!("Failed to parse {}.json", filename));
            validate(&schema)
                .unwrap_or_else(|err| panic!("Schema {}.json is invalid: {}", filename, err));

            // Canonical text document
            let text = schema_text(&schema);
            let text_path = golden_dir.join(format!("{}.text", filename));
            fs::write(&text_path, &text)
                .unwrap_or_else(|_| panic!("Failed to write {}.text", filename));
            println!("  Generated: golden/{}.text", filename);

            // Schema content id
            let id = schema_id(&schema);
            let id_path = golden_dir.join(format!("{}.sha256", filename));
            fs::write(&id_path, format!("{}\n", id))
                .unwrap_or_else(|_| panic!("Failed to write {}.sha256", filename));
            println!("  Generated: golden/{}.sha256", filename);

            count += 1;
        }
    }

    println!();
    println!("Done! Generated golden files for {} schema(s).", count);
}
