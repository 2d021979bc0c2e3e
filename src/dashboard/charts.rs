//! The spending trend chart and the ECharts plumbing that renders it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, money::cents_to_dollars, transaction::MonthTotal};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The HTML containers the chart scripts render into.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }
        }
    )
}

/// JavaScript that initializes each chart with dark mode support and
/// responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A line chart of income and spend per month over the selected range, with a
/// three month moving average of spend smoothing out one-off purchases.
///
/// `spend_ma3` must hold one value per entry in `trend`, in cents.
pub(super) fn trend_chart(trend: &[MonthTotal], spend_ma3: &[f64]) -> Chart {
    let labels: Vec<String> = trend.iter().map(|total| total.month.to_string()).collect();
    let income: Vec<f64> = trend
        .iter()
        .map(|total| cents_to_dollars(total.income_cents))
        .collect();
    let spend: Vec<f64> = trend
        .iter()
        .map(|total| cents_to_dollars(total.spend_cents))
        .collect();
    let average: Vec<f64> = spend_ma3.iter().map(|&cents| cents / 100.0).collect();

    Chart::new()
        .title(Title::new().text("Spending Trend").left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Spending").data(spend))
        .series(Line::new().name("3-month average").data(average))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
