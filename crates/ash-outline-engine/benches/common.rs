// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_resource(actions: usize) -> String {
    let mut content = String::from(
        "defmodule Bench.Resource do\n  use Ash.Resource,\n    domain: Bench,\n    data_layer: AshPostgres.DataLayer\n\n",
    );

    content.push_str("  attributes do\n    uuid_primary_key :id\n");
    for i in 0..actions {
        content.push_str(&format!(
            "    attribute :field_{i}, :string do\n      allow_nil? false\n      description \"field {i} do end\"\n    end\n"
        ));
    }
    content.push_str("  end\n\n");

    content.push_str("  actions do\n    defaults [:read]\n");
    for i in 0..actions {
        content.push_str(&format!(
            "    create :create_{i} do\n      accept [:field_{i}]\n      change fn changeset, _ -> changeset end\n    end\n\n"
        ));
    }
    content.push_str("  end\n\n");

    content.push_str("  code_interface do\n");
    for i in 0..actions {
        content.push_str(&format!("    define :create_{i}\n"));
    }
    content.push_str("  end\nend\n");

    content
}

#[allow(dead_code)]
pub fn generate_unknown_module(blocks: usize) -> String {
    let mut content = String::from("defmodule Bench.Other do\n  use Other.Dsl\n\n");
    for i in 0..blocks {
        content.push_str(&format!(
            "  block_{i} do\n    entry :a_{i}\n    entry \"b_{i}\" do\n      nested :c\n    end\n  end\n\n"
        ));
    }
    content.push_str("end\n");
    content
}
