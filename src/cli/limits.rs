use crate::domain::{Channel, Plan};

pub fn run() -> anyhow::Result<()> {
    println!("{}", render());
    Ok(())
}

/// Plan table as aligned text, counts as monthly/daily/hourly
fn render() -> String {
    let mut lines = vec![format!("{:<14}{:<16}{}", "PLAN", "GUI", "API")];

    for plan in Plan::ALL {
        let limits = plan.limits();
        lines.push(format!(
            "{:<14}{:<16}{}",
            plan.as_str(),
            limits.for_channel(Channel::Gui).to_string(),
            limits.for_channel(Channel::Api)
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_plan() {
        let table = render();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), Plan::ALL.len() + 1);
        assert!(lines[0].starts_with("PLAN"));
        assert!(table.contains("50/3/1"));
        assert!(table.contains("30/1/1"));
        assert!(table.contains("10000/1000/100"));
    }
}
