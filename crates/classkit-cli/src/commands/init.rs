//! The `classkit init` command.

use std::path::Path;

use anyhow::Result;

use classkit_core::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    for (path, content) in [
        (CONFIG_FILE_NAME, SAMPLE_CONFIG),
        ("jokes.txt", SAMPLE_JOKES),
        ("students.txt", SAMPLE_STUDENTS),
    ] {
        if Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: classkit quiz");
    println!("  2. Run: classkit joke");
    println!("  3. Run: classkit students list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# classkit configuration

jokes_path = "jokes.txt"
students_path = "students.txt"

# Skip the quiz menu: "easy", "moderate" or "advanced"
# default_difficulty = "easy"
"#;

const SAMPLE_JOKES: &str = "\
Why did the scarecrow win an award?Because he was outstanding in his field.
What do you call a fake noodle?An impasta.
Why was the maths book sad?It had too many problems.
What do you call a bear with no teeth?A gummy bear.
Why can't a bicycle stand up by itself?It's two tired.
";

const SAMPLE_STUDENTS: &str = "\
5
1345,John Curry,8,15,7,45
2345,Sam Sturgeon,14,15,14,77
9876,Lee Scott,17,11,16,99
3724,Matt Thompson,19,11,15,81
1212,Ron Herrema,14,17,18,66
";
