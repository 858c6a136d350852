// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
     _
 ___(_) __ _ ___  ___ _ ____   _____
/ __| |/ _` / __|/ _ \ '__\ \ / / _ \
\__ \ | (_| \__ \  __/ |   \ V /  __/
|___/_|\__, |___/\___|_|    \_/ \___|
       |___/

    Type Signature Generation Service
"#;
    println!("{}", banner);
}
