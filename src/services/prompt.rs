use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Whether the model should answer in prose or with Mermaid charts plus prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Text,
    Chart,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Text => "text",
            AnalysisMode::Chart => "chart",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AnalysisMode::Text => TEXT_SYSTEM_PROMPT,
            AnalysisMode::Chart => CHART_SYSTEM_PROMPT,
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(AnalysisMode::Text),
            "chart" => Ok(AnalysisMode::Chart),
            other => Err(AppError::Validation(format!(
                "不支持的分析模式: {}（可选值: text, chart）",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Wraps the formatted dataset and the caller's instruction into system and user prompts.
pub fn build_prompt(
    formatted_content: &str,
    instruction: &str,
    mode: AnalysisMode,
) -> Result<BuiltPrompt, AppError> {
    if instruction.trim().is_empty() {
        return Err(AppError::Validation("请提供分析提示词".to_string()));
    }

    let user_prompt = match mode {
        AnalysisMode::Text => format!(
            "请分析以下数据：\n{}\n\n{}\n\n分析要求：{}",
            USER_PREAMBLE, formatted_content, instruction
        ),
        AnalysisMode::Chart => format!(
            "请分析以下数据，并使用Mermaid语法创建一个图表来展示分析结果。\n{}\n\n{}\n\n分析要求：{}\n\n{}",
            USER_PREAMBLE, formatted_content, instruction, CHART_RESPONSE_ORDER
        ),
    };

    Ok(BuiltPrompt {
        system_prompt: mode.system_prompt().to_string(),
        user_prompt,
    })
}

const USER_PREAMBLE: &str = "请注意：
1. 数据已经过预处理和采样
2. 统计信息是基于全量数据
3. 采样数据用于辅助验证";

const CHART_RESPONSE_ORDER: &str = "请按照以下格式返回：
1. 首先是完整的Mermaid图表代码
2. 然后是对图表的分析说明，分析时请结合统计信息";

const TEXT_SYSTEM_PROMPT: &str = "你是一个专业的数据分析师，请根据提供的数据和分析要求，给出详细的分析结果。分析时请注意：
1. 数据的完整性和准确性
2. 数据中的关键趋势和模式
3. 异常值和特殊情况
4. 提供具体的数据支持
5. 给出合理的建议和洞见";

const CHART_SYSTEM_PROMPT: &str = r#"你是一个专业的数据可视化专家。请使用Mermaid语法创建图表来展示数据分析结果，并提供分析说明。

注意事项：
1. 数据的完整性和准确性
2. 返回格式为：先是Mermaid图表代码，后跟文字分析
3. 确保Mermaid语法正确
4. 图表类型根据数据特点选择最合适的（饼图、折线图、XY图等）
5. 所有图表，请确保：
   - 添加标题
   - 图例说明清晰
   - 数据标签合理

6. 对于饼图，请确保：
   - 包含百分比标签
   - 合理的颜色区分
   - 重要数据突出显示

7. 对于折线图，请确保：
   - 添加X轴和Y轴的标签
   - 数据点标记清晰
   - 使用合适的线条样式
   - 一定要包含line数据
   - 不需要bar数据
   - 多条线时使用不同的线型

8. 对于XY图，请确保：
   - 一定要包含line,bar结构数据
   - 坐标轴标签明确
   - 数据点分布清晰
   - 合理的数据范围
   - 重要数据点标注

9. 在图表代码后，另起一行添加对图表的分析说明

图表mermaid示例格式：

1. 饼图示例：
```mermaid
pie showData
    title 客户分布情况
    "新客户" : 30
    "老客户" : 70
```

2. 折线图示例：
```mermaid
xychart-beta 
    title "所属校区与客户数量的关系"
    x-axis ["A测试校区", "台北校区", "澎湖校区", "唐校长的校区1234", "聂卫平围棋网校-新"]
    y-axis "客户数量" 0 --> 10
    line [1, 2, 3, 5, 6]
```

3. XY图示例：
```mermaid
 xychart-beta
    title "所属校区与客户数量的关系"
    x-axis ["A测试校区", "台北校区", "澎湖校区", "唐校长的校区1234", "聂卫平围棋网校-新"]
    y-axis "客户数量" 0 --> 10
    bar [1, 2, 3, 5, 6]
    line [1, 2, 3, 5, 6]
```

分析说明示例：
根据图表可以看出以下特点：
1. 数据分布情况...
2. 主要趋势为...
3. 关键发现...
4. 建议..."#;
