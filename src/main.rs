//! # Formflow CLI
//!
//! Usage:
//!   formflow input.json -o layout.json
//!   echo '{ ... }' | formflow -o layout.json
//!   formflow input.json --font DejaVuSans.ttf
//!   formflow --example > survey.json
//!
//! Set `RUST_LOG=debug` to see page breaks as they happen.

use std::env;
use std::fs;
use std::io::{self, Read};

use formflow::backend::{FontMetrics, Metrics};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_survey_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => fail(&format!("Failed to read input: {}", e)),
    };

    let output_path = flag_value(&args, "-o").unwrap_or_else(|| "output.json".to_string());

    let metrics = match flag_value(&args, "--font") {
        Some(path) => {
            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(e) => fail(&format!("Failed to read font {}: {}", path, e)),
            };
            match FontMetrics::from_font_data(&data) {
                Ok(metrics) => Metrics::TrueType(metrics),
                Err(e) => fail(&e.to_string()),
            }
        }
        None => Metrics::Helvetica,
    };

    match formflow::layout_json(&input, metrics) {
        Ok(json) => {
            if let Err(e) = fs::write(&output_path, &json) {
                fail(&format!("Failed to write {}: {}", output_path, e));
            }
            eprintln!("✓ Written {} bytes to {}", json.len(), output_path);
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    std::process::exit(1);
}

fn example_survey_json() -> &'static str {
    r##"{
  "title": "Customer Feedback",
  "description": "Tell us how we did. It takes about two minutes.",
  "logo": { "src": "logo.png", "position": "right", "width": 120, "height": 60 },
  "page": {
    "size": "Letter",
    "margin": { "top": 54, "right": 54, "bottom": 54, "left": 54 }
  },
  "fontSize": 12,
  "pages": [
    {
      "name": "about-you",
      "title": "About you",
      "rows": [
        {
          "elements": [
            {
              "type": "question",
              "name": "first-name",
              "title": "First name",
              "number": "1",
              "width": "50%",
              "body": { "kind": "text" }
            },
            {
              "type": "question",
              "name": "last-name",
              "title": "Last name",
              "number": "2",
              "body": { "kind": "text" }
            }
          ]
        },
        {
          "elements": [
            {
              "type": "question",
              "name": "visits",
              "title": "How often do you visit?",
              "number": "3",
              "titleLocation": "left",
              "body": {
                "kind": "choice",
                "choices": ["Weekly", "Monthly", "A few times a year", "This was my first visit"]
              }
            }
          ]
        }
      ]
    },
    {
      "name": "experience",
      "title": "Your experience",
      "description": "Anything you share stays with our support team.",
      "rows": [
        {
          "elements": [
            {
              "type": "panel",
              "name": "ratings",
              "title": "Ratings",
              "innerIndent": 1,
              "rows": [
                {
                  "elements": [
                    {
                      "type": "question",
                      "name": "service",
                      "title": "What did we do well?",
                      "number": "4",
                      "body": {
                        "kind": "choice",
                        "multiple": true,
                        "hasOther": true,
                        "choices": ["Friendly staff", "Short wait", "Fair prices"]
                      },
                      "comment": "Anything else we should keep doing?"
                    }
                  ]
                }
              ]
            }
          ]
        },
        {
          "elements": [
            {
              "type": "question",
              "name": "improve",
              "title": "What should we improve?",
              "number": "5",
              "titleLocation": "bottom",
              "body": { "kind": "comment", "rows": 5 }
            }
          ]
        }
      ]
    }
  ]
}
"##
}
