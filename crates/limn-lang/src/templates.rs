use crate::Language;

// Starter templates loaded whenever a language is selected. The buffer is
// replaced wholesale; nothing from the previous language survives.

const PYTHON: &str = r#"# Python Code
def greet(name):
    return f"Hello {name} from limn!"

print(greet("World"))
print("Python is running!")"#;

const JAVA: &str = r#"// Java Code
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello limn!");
        System.out.println("Java is running!");

        String name = "World";
        System.out.println("Hello " + name);
    }
}"#;

const SQL: &str = r#"-- SQL Code
-- Create a sample table
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE,
    age INTEGER
);

-- Insert sample data
INSERT INTO users (name, email, age) VALUES ('Alice', 'alice@example.com', 25);
INSERT INTO users (name, email, age) VALUES ('Bob', 'bob@example.com', 30);
INSERT INTO users (name, email, age) VALUES ('Charlie', 'charlie@example.com', 28);

-- Query the data
SELECT * FROM users;
SELECT name, age FROM users WHERE age > 26;"#;

const R: &str = r#"# R Code
# Data analysis and visualization

# Create a vector
ages <- c(25, 30, 28, 35, 22)
names <- c("Alice", "Bob", "Charlie", "David", "Eve")

# Print values
print("Ages:")
print(ages)

# Calculate statistics
cat("\nMean age:", mean(ages), "\n")
cat("Median age:", median(ages), "\n")
cat("Max age:", max(ages), "\n")

# Create a data frame
df <- data.frame(Name = names, Age = ages)
print("\nData Frame:")
print(df)"#;

const JAVASCRIPT: &str = r#"// JavaScript Code
function greet(name) {
    return `Hello ${name} from limn!`;
}

console.log(greet("World"));
console.log("JavaScript is running!");"#;

const C: &str = r#"#include <stdio.h>

int main() {
    printf("Hello limn!\n");
    printf("C is running!\n");

    char name[] = "World";
    printf("Hello %s\n", name);

    return 0;
}"#;

const CPP: &str = r#"#include <iostream>
#include <string>
using namespace std;

int main() {
    cout << "Hello limn!" << endl;
    cout << "C++ is running!" << endl;

    string name = "World";
    cout << "Hello " << name << endl;

    return 0;
}"#;

const GO: &str = r#"package main

import "fmt"

func main() {
    fmt.Println("Hello limn!")
    fmt.Println("Go is running!")

    // Example with input
    var name string
    fmt.Print("Enter your name: ")
    fmt.Scan(&name)
    fmt.Printf("Hello %s from limn!\n", name)

    // Math example with multiple inputs
    var a, b int
    fmt.Print("Enter two numbers: ")
    fmt.Scan(&a, &b)
    fmt.Printf("Sum = %d\n", a+b)
}"#;

const PHP: &str = r#"<?php
echo "Hello limn!\n";
echo "PHP is running!\n";

// Example with input
echo "Enter your name: ";
$name = trim(fgets(STDIN));
echo "Hello " . $name . " from limn!\n";

// Math example
echo "Enter a number: ";
$num = trim(fgets(STDIN));
echo "Double: " . ($num * 2) . "\n";
?>"#;

const TYPESCRIPT: &str = r#"// TypeScript Code
function greet(name: string): string {
    return `Hello ${name} from limn!`;
}

console.log(greet("World"));
console.log("TypeScript is running!");

// Example with typed arrays
const numbers: number[] = [1, 2, 3, 4, 5];
console.log("Numbers:", numbers);"#;

pub(crate) fn template(lang: Language) -> &'static str {
    match lang {
        Language::Python => PYTHON,
        Language::Java => JAVA,
        Language::Sql => SQL,
        Language::R => R,
        Language::JavaScript => JAVASCRIPT,
        Language::C => C,
        Language::Cpp => CPP,
        Language::Go => GO,
        Language::Php => PHP,
        Language::TypeScript => TYPESCRIPT,
    }
}
