//! Index Handler - 上传页面

use axum::response::Html;

/// 上传页面
///
/// 文件字段名固定为 `pptx_file`；页面脚本订阅 /ws/events
/// 并在转换开始/完成时更新状态栏
pub const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Slidevox - PPTX to Speech</title>
</head>
<body>
    <h1>Convert a PowerPoint to Speech</h1>
    <form method="post" enctype="multipart/form-data">
        <input type="file" name="pptx_file" accept=".pptx">
        <input type="submit" value="Convert">
    </form>
    <p id="conversion-status"></p>
    <script>
        var proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
        var socket = new WebSocket(proto + location.host + '/ws/events');

        socket.onopen = function() {
            console.log('Connected to server');
        };

        socket.onmessage = function(msg) {
            var data = JSON.parse(msg.data);
            if (data.event === 'conversion_started') {
                document.getElementById('conversion-status').innerHTML = 'Conversion in progress...';
            } else if (data.event === 'conversion_completed') {
                document.getElementById('conversion-status').innerHTML = 'Conversion completed!';
            }
        };
    </script>
</body>
</html>
"#;

/// GET / - 返回上传页面
pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}
