use crate::cli::{SolutionsArgs, SolutionsCommands};
use crate::error::{CliError, Result};
use reactorsim::core::solutions::Solution;

pub async fn run(args: SolutionsArgs) -> Result<()> {
    match args.command {
        SolutionsCommands::List => {
            println!("Available solutions:");
            for solution in Solution::ALL {
                print_solution(&solution);
            }
            println!();
            println!("Issues: {}", Solution::ISSUES.join(", "));
        }
        SolutionsCommands::Show { issue } => {
            let solutions = select(&issue)?;
            println!("Solutions for '{}':", issue);
            for solution in solutions {
                print_solution(solution);
            }
        }
    }
    Ok(())
}

fn select(issue: &str) -> Result<&'static [Solution]> {
    Solution::for_issue(issue).map_err(|e| {
        CliError::Argument(format!(
            "{} (known issues: {})",
            e,
            Solution::ISSUES.join(", ")
        ))
    })
}

fn print_solution(solution: &Solution) {
    println!("  {:<24} {}", solution.id(), solution.name());
    println!("  {:<24} {}", "", solution.description());
    println!("  {:<24} Source: {}", "", solution.source());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_lookup_accepts_kebab_case() {
        assert_eq!(
            select("material-damage").unwrap(),
            &[Solution::TungstenCopperWall]
        );
    }

    #[test]
    fn unknown_issue_lists_the_known_ones() {
        let err = select("boredom").unwrap_err();
        assert!(matches!(err, CliError::Argument(ref msg) if msg.contains("safety_factor")));
    }
}
