//! Example demonstrating stable sorting and the sequence combinators.
//!
//! Walks through sorting by derived keys, sorting by field name, and
//! combining lists while preserving input order throughout.

use underkit::{
    FieldByName, Nested, difference, flatten, intersection, invoke_named, sort_by_field,
    sort_by_key, zip,
};

#[derive(Debug, Clone)]
struct Person {
    name: &'static str,
    age: Option<u32>,
}

impl FieldByName for Person {
    type Field = u32;

    fn field_by_name(&self, name: &str) -> Option<u32> {
        match name {
            "age" => self.age,
            _ => None,
        }
    }
}

fn main() {
    println!("=== Stable Sorting Example ===\n");

    let words = ["one", "two", "three", "four", "five"];
    println!("Input:          {words:?}");
    println!(
        "By length:      {:?}",
        sort_by_key(&words, |word| Some(word.len()))
    );
    println!("By field name:  {:?}\n", sort_by_field(&words, "length"));

    let people = vec![
        Person {
            name: "curly",
            age: Some(50),
        },
        Person {
            name: "moe",
            age: Some(40),
        },
        Person {
            name: "anonymous",
            age: None,
        },
        Person {
            name: "larry",
            age: Some(60),
        },
    ];
    let by_age = sort_by_field(&people, "age");
    let order: Vec<&str> = by_age.iter().map(|person| person.name).collect();
    println!("People by age:  {order:?}");
    println!("Notice: the ageless entry sorts last, not first.\n");

    println!("=== Sequence Combinators ===\n");

    let shouted = invoke_named(&words, "to_uppercase").unwrap();
    println!("invoke_named:   {shouted:?}");

    let nested = vec![
        Nested::item(1),
        Nested::list(vec![Nested::item(2), Nested::list(vec![Nested::item(3)])]),
        Nested::item(4),
    ];
    println!("flatten:        {:?}", flatten(&nested));

    let names = ["moe", "larry", "curly"];
    let roles = ["boss", "middle"];
    println!("zip:            {:?}", zip(&[&names, &roles]));

    let stooges = ["moe", "curly", "larry"];
    let leaders = ["moe", "groucho"];
    println!("intersection:   {:?}", intersection(&stooges, &[&leaders]));
    println!("difference:     {:?}", difference(&stooges, &[&leaders]));

    println!("\n=== Example Complete ===");
    println!("Every operation above emits results in first-list order.");
}
